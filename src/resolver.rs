use std::sync::Arc;
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{
    any::{TypeInfo, Value},
    errors::{InjectErrorKind, ResolveErrorKind},
    hooks::Hooks,
    inject::Injectable,
    registry::{Provider, Registry},
    utils::future::BoxFuture,
};

/// Resolves one injection type from `registry` or its ancestors.
///
/// A value is returned as is, a constructor is realized (or its realization joined).
/// A missing entry is reported as [`ResolveErrorKind::NoEntry`], distinct from a failed realization.
pub(crate) fn get_value(registry: Arc<Registry>, type_info: TypeInfo) -> BoxFuture<'static, Result<Value, ResolveErrorKind>> {
    let span = debug_span!("get_value", injection_type = %type_info, scope = %registry.name);

    Box::pin(
        async move {
            match registry.lookup(&type_info) {
                None => {
                    debug!("No entry");
                    Err(ResolveErrorKind::NoEntry { type_info })
                }
                Some((_, Provider::Value(value))) => {
                    debug!("Found value");
                    Ok(value)
                }
                Some((owner, Provider::Node(node))) => node.realize(owner).await,
            }
        }
        .instrument(span),
    )
}

/// Fills every field of every target.
///
/// All fields of all targets are resolved concurrently and every resolution is awaited.
/// Resolved values are assigned even when another field fails.
/// A field without entry is left untouched unless the `no_value_for_field` hook escalates.
/// The reported error is the first one in target order, then field declaration order.
pub(crate) async fn inject(registry: &Arc<Registry>, hooks: &Hooks, targets: &mut [&mut dyn Injectable]) -> Result<(), InjectErrorKind> {
    let pending = targets
        .iter_mut()
        .map(|target| {
            let name = target.target_name();
            let fields = target.fields();
            let handles = fields
                .iter()
                .map(|field| tokio::spawn(get_value(registry.clone(), field.info().type_info)))
                .collect::<Vec<_>>();
            (name, fields, handles)
        })
        .collect::<Vec<_>>();

    let mut first_err = None;
    for (target, fields, handles) in pending {
        for (mut field, handle) in fields.into_iter().zip(handles) {
            let info = *field.info();
            let result = match handle.await {
                Ok(result) => result,
                Err(_) => Err(ResolveErrorKind::Interrupted { type_info: info.type_info }),
            };

            let err = match result {
                Ok(value) => {
                    if field.assign(&value) {
                        debug!(injection_target = %target, field = info.name, "Field injected");
                        continue;
                    }
                    InjectErrorKind::Field {
                        target: target.clone(),
                        field: info.name,
                        type_info: info.type_info,
                        source: ResolveErrorKind::IncorrectType { expected: info.type_info },
                    }
                }
                Err(ResolveErrorKind::NoEntry { .. }) => match hooks.no_value_for_field(&target, &info) {
                    Ok(()) => {
                        debug!(injection_target = %target, field = info.name, "No value for field, left untouched");
                        continue;
                    }
                    Err(err) => InjectErrorKind::NoValueForField {
                        target: target.clone(),
                        field: info.name,
                        error: err,
                    },
                },
                Err(err) => InjectErrorKind::Field {
                    target: target.clone(),
                    field: info.name,
                    type_info: info.type_info,
                    source: err,
                },
            };

            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }

    match first_err {
        Some(err) => {
            error!("{}", err);
            Err(err)
        }
        None => Ok(()),
    }
}
