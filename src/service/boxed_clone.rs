use super::base::Service;

pub(crate) struct BoxCloneService<Request, Response, Error>(
    pub(crate) Box<dyn CloneService<Request, Response = Response, Error = Error> + Send + Sync>,
);

pub(crate) trait CloneService<Request>: Service<Request> {
    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneService<Request, Response = Self::Response, Error = Self::Error> + Send + Sync>;
}

impl<Request, T> CloneService<Request> for T
where
    T: Service<Request> + Clone + Send + Sync + 'static,
{
    #[inline]
    fn clone_box(&self) -> Box<dyn CloneService<Request, Response = T::Response, Error = T::Error> + Send + Sync> {
        Box::new(self.clone())
    }
}

impl<Request, Response, Error> Clone for BoxCloneService<Request, Response, Error> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl<Request, Response, Error> Service<Request> for BoxCloneService<Request, Response, Error> {
    type Response = Response;
    type Error = Error;

    #[inline]
    fn call(&mut self, request: Request) -> Result<Self::Response, Self::Error> {
        self.0.call(request)
    }
}

#[cfg(test)]
mod tests {
    use core::{
        convert::Infallible,
        sync::atomic::{AtomicU8, Ordering},
    };
    use std::sync::Arc;

    use super::BoxCloneService;
    use crate::service::{service_fn, Service as _};

    #[test]
    fn test_clones_share_captures() {
        let calls = Arc::new(AtomicU8::new(0));
        let mut service: BoxCloneService<u8, u8, Infallible> = BoxCloneService(Box::new(service_fn({
            let calls = calls.clone();
            move |request: u8| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(request + 1)
            }
        })));
        let mut cloned = service.clone();

        assert_eq!(service.call(1).unwrap(), 2);
        assert_eq!(cloned.call(2).unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
