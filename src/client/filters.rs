//! Outgoing request / incoming response filter lists, per §4.6. Each filter
//! is a total function over the message, run in order; a filter observing
//! an error in a prior stage cannot recover it (there is no error channel
//! here — construction failures abort before filters ever run).

use std::sync::Arc;

use crate::request::HttpRequest;
use crate::response::HttpResponse;

pub type RequestFilter = Arc<dyn Fn(HttpRequest) -> HttpRequest + Send + Sync>;
pub type ResponseFilter = Arc<dyn Fn(HttpResponse) -> HttpResponse + Send + Sync>;

pub fn run_outgoing(filters: &[RequestFilter], mut req: HttpRequest) -> HttpRequest {
    for filter in filters {
        req = filter(req);
    }
    req
}

pub fn run_incoming(filters: &[ResponseFilter], mut res: HttpResponse) -> HttpResponse {
    for filter in filters {
        res = filter(res);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::header_consts::HOST;
    use crate::http::{Method, Version};
    use crate::uri::Uri;

    #[test]
    fn outgoing_filters_run_in_order() {
        let add_marker: RequestFilter = Arc::new(|mut req: HttpRequest| {
            req.headers.append(HOST, "rewritten.example".into());
            req
        });
        let req = HttpRequest::new(Method::Get, Uri::parse("/").unwrap(), Version::OneDotOne);
        let out = run_outgoing(&[add_marker], req);
        assert_eq!(out.headers.get(&HOST).unwrap().as_str(), "rewritten.example");
    }
}
