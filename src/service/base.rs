/// A callable taking a request by value.
///
/// Constructors are erased to this shape once classified: the request is the list
/// of realized inputs, the response the realized value.
pub(crate) trait Service<Request> {
    type Response;
    type Error;

    fn call(&mut self, request: Request) -> Result<Self::Response, Self::Error>;
}
