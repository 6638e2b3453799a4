use vercel_runtime::{Body, Response};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

pub fn add_cors(mut resp: Response<Body>) -> Response<Body> {
    let h = resp.headers_mut();
    h.insert("Access-Control-Allow-Origin", ALLOW_ORIGIN.parse().unwrap());
    h.insert("Access-Control-Allow-Methods", ALLOW_METHODS.parse().unwrap());
    h.insert("Access-Control-Allow-Headers", ALLOW_HEADERS.parse().unwrap());
    resp
}

/// 405 responses name the methods this function answers.
pub fn add_allow(mut resp: Response<Body>) -> Response<Body> {
    resp.headers_mut().insert("Allow", ALLOW_METHODS.parse().unwrap());
    resp
}
