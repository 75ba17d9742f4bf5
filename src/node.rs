use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{
    any::{TypeInfo, Value},
    errors::{InstantiatorErrorKind, ResolveErrorKind},
    instantiator::Constructor,
    registry::Registry,
    resolver, validator,
};

pub(crate) type Outcome = Result<Value, ResolveErrorKind>;

enum State {
    Unrealized,
    Realizing(watch::Receiver<Option<Outcome>>),
    Realized(Value),
    Failed(ResolveErrorKind),
}

enum Step {
    Done(Outcome),
    Wait(watch::Receiver<Option<Outcome>>),
    Start(watch::Sender<Option<Outcome>>),
}

/// Lazy, single-flight cell around one constructor.
///
/// The first caller starts the realization in its own task, every caller awaits the same outcome,
/// and the outcome is kept for the lifetime of the node.
pub(crate) struct Node {
    pub(crate) constructor: Arc<Constructor>,
    state: Mutex<State>,
}

impl Node {
    #[must_use]
    pub(crate) fn new(constructor: Arc<Constructor>) -> Self {
        Self {
            constructor,
            state: Mutex::new(State::Unrealized),
        }
    }

    /// Node sharing the constructor, keeping the value only if already realized.
    #[must_use]
    pub(crate) fn fork(&self) -> Self {
        let state = match &*self.state.lock() {
            State::Realized(value) => State::Realized(value.clone()),
            State::Unrealized | State::Realizing(_) | State::Failed(_) => State::Unrealized,
        };
        Self {
            constructor: self.constructor.clone(),
            state: Mutex::new(state),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn type_info(&self) -> TypeInfo {
        self.constructor.signature.provides
    }

    /// Realizes the node against `owner`, the layer it is registered in, or joins a running realization.
    pub(crate) async fn realize(self: Arc<Self>, owner: Arc<Registry>) -> Outcome {
        let step = {
            let mut state = self.state.lock();
            match &*state {
                State::Realized(value) => Step::Done(Ok(value.clone())),
                State::Failed(err) => Step::Done(Err(err.clone())),
                State::Realizing(receiver) if receiver.has_changed().is_ok() => Step::Wait(receiver.clone()),
                State::Unrealized | State::Realizing(_) => {
                    let (sender, receiver) = watch::channel(None);
                    *state = State::Realizing(receiver);
                    Step::Start(sender)
                }
            }
        };

        let receiver = match step {
            Step::Done(outcome) => {
                debug!("Found in cache");
                return outcome;
            }
            Step::Wait(receiver) => {
                debug!("Waiting for realization");
                receiver
            }
            Step::Start(sender) => {
                let receiver = sender.subscribe();
                let span = debug_span!("realize", injection_type = %self.type_info(), scope = %owner.name);
                tokio::spawn(self.clone().run(owner, sender).instrument(span));
                receiver
            }
        };

        self.wait(receiver).await
    }

    /// A realization task dropped without outcome, on runtime shutdown, leaves the node
    /// unrealized for the next caller.
    async fn wait(&self, mut receiver: watch::Receiver<Option<Outcome>>) -> Outcome {
        let outcome = receiver.wait_for(Option::is_some).await.ok().and_then(|outcome| (*outcome).clone());
        if let Some(outcome) = outcome {
            return outcome;
        }

        let mut state = self.state.lock();
        if matches!(&*state, State::Realizing(current) if current.same_channel(&receiver)) {
            *state = State::Unrealized;
        }
        drop(state);

        let err = ResolveErrorKind::Interrupted {
            type_info: self.type_info(),
        };
        error!("{}", err);
        Err(err)
    }

    async fn run(self: Arc<Self>, owner: Arc<Registry>, sender: watch::Sender<Option<Outcome>>) {
        debug!("Realizing");

        let outcome = self.construct(&owner).await;
        match &outcome {
            Ok(_) => debug!("Realized"),
            Err(err) => error!("{}", err),
        }

        *self.state.lock() = match &outcome {
            Ok(value) => State::Realized(value.clone()),
            Err(err) => State::Failed(err.clone()),
        };
        sender.send_replace(Some(outcome));
    }

    async fn construct(&self, owner: &Arc<Registry>) -> Outcome {
        let signature = &self.constructor.signature;

        if owner.config.detect_cycles {
            if let Err(err) = validator::detect_cycle_from(owner, &signature.provides) {
                return Err(ResolveErrorKind::Graph {
                    type_info: signature.provides,
                    source: err,
                });
            }
        }

        let handles = signature
            .dependencies
            .iter()
            .map(|type_info| (*type_info, tokio::spawn(resolver::get_value(owner.clone(), *type_info))))
            .collect::<Vec<_>>();

        let mut values = Vec::with_capacity(handles.len());
        let mut first_err = None;
        for (position, (type_info, handle)) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(_) => Err(ResolveErrorKind::Interrupted { type_info }),
            };
            match result {
                Ok(value) => values.push(value),
                Err(err) => {
                    if first_err.is_none() {
                        first_err = Some((position, err));
                    }
                }
            }
        }

        if let Some((position, err)) = first_err {
            return Err(ResolveErrorKind::Instantiator {
                signature: signature.clone(),
                source: InstantiatorErrorKind::Deps {
                    position,
                    source: Arc::new(err),
                },
            });
        }

        self.constructor
            .invoke(values)
            .map_err(|err| ResolveErrorKind::Instantiator {
                signature: signature.clone(),
                source: InstantiatorErrorKind::Factory(err),
            })
    }
}

#[cfg(test)]
mod tests {
    use core::{
        convert::Infallible,
        future::{poll_fn, Future as _},
        sync::atomic::{AtomicU8, Ordering},
        task::Poll,
    };
    use std::sync::Arc;
    use tokio::runtime::Builder;
    use tracing_test::traced_test;

    use super::{Node, State};
    use crate::{config::Config, errors::ResolveErrorKind, instantiator::Constructor, registry::Registry};

    fn counting_node(calls: &Arc<AtomicU8>) -> Arc<Node> {
        let calls = calls.clone();
        Arc::new(Node::new(Arc::new(Constructor::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(42_u32)
        }))))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[traced_test]
    async fn test_single_flight() {
        let calls = Arc::new(AtomicU8::new(0));
        let node = counting_node(&calls);
        let owner = Arc::new(Registry::root(Config::default()));

        let handles = (0..16)
            .map(|_| tokio::spawn(node.clone().realize(owner.clone())))
            .collect::<Vec<_>>();
        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(*value.downcast_ref::<u32>().unwrap(), 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(*node.state.lock(), State::Realized(_)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_fork() {
        let calls = Arc::new(AtomicU8::new(0));
        let node = counting_node(&calls);
        let owner = Arc::new(Registry::root(Config::default()));

        let unrealized = node.fork();
        assert!(matches!(*unrealized.state.lock(), State::Unrealized));

        node.clone().realize(owner.clone()).await.unwrap();
        let realized = Arc::new(node.fork());
        assert!(matches!(*realized.state.lock(), State::Realized(_)));

        realized.realize(owner.clone()).await.unwrap();
        Arc::new(unrealized).realize(owner).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_realize_again_after_runtime_shutdown() {
        let calls = Arc::new(AtomicU8::new(0));
        let node = counting_node(&calls);
        let owner = Arc::new(Registry::root(Config::default()));

        let mut waiting = Box::pin(node.clone().realize(owner.clone()));
        let runtime = Builder::new_current_thread().build().unwrap();
        runtime.block_on(poll_fn(|cx| {
            assert!(waiting.as_mut().poll(cx).is_pending());
            Poll::Ready(())
        }));
        drop(runtime);

        assert!(matches!(*node.state.lock(), State::Realizing(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let runtime = Builder::new_current_thread().build().unwrap();
        let err = runtime.block_on(waiting).unwrap_err();
        assert!(matches!(err, ResolveErrorKind::Interrupted { .. }));
        assert!(matches!(*node.state.lock(), State::Unrealized));

        let value = runtime.block_on(node.clone().realize(owner)).unwrap();
        assert_eq!(*value.downcast_ref::<u32>().unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_dropped_realization_is_restarted() {
        let calls = Arc::new(AtomicU8::new(0));
        let node = counting_node(&calls);
        let owner = Arc::new(Registry::root(Config::default()));

        let runtime = Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let mut realize = Box::pin(node.clone().realize(owner.clone()));
            poll_fn(|cx| {
                assert!(realize.as_mut().poll(cx).is_pending());
                Poll::Ready(())
            })
            .await;
        });
        drop(runtime);

        let runtime = Builder::new_current_thread().build().unwrap();
        let value = runtime.block_on(node.clone().realize(owner)).unwrap();
        assert_eq!(*value.downcast_ref::<u32>().unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
