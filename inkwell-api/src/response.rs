/// Success envelopes
///
/// Every success body carries a `status` field next to its payload. Listing
/// endpoints wrap rows in `datas`; create endpoints report `status: 201`
/// inside an HTTP 200 response.

use serde::Serialize;

/// `{status, message}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
        }
    }

    /// A non-error outcome where nothing happened
    pub fn not_done(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
        }
    }
}

/// `{status: 201, message}`
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub status: u16,
    pub message: String,
}

impl CreatedResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: 201,
            message: message.into(),
        }
    }
}

/// `{status, datas}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub status: bool,
    pub datas: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(datas: Vec<T>) -> Self {
        Self { status: true, datas }
    }
}

/// `{code, status, datas}`, the todo listing shape
#[derive(Debug, Serialize)]
pub struct CodedListResponse<T> {
    pub code: u16,
    pub status: bool,
    pub datas: Vec<T>,
}

impl<T> CodedListResponse<T> {
    pub fn new(datas: Vec<T>) -> Self {
        Self {
            code: 200,
            status: true,
            datas,
        }
    }
}
