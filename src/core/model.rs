//! Record model
//!
//! License records are forwarded exactly as the remote API returns them. Nothing at this
//! layer inspects or validates their fields.

/// A single license record: one JSON object from the remote dataset.
pub type LicenseRecord = serde_json::Value;

/// One page of records, in the order the remote API returned them.
pub type Page = Vec<LicenseRecord>;

/// Decode a page body. The body must be a JSON array; its elements are kept as-is.
pub fn decode_page(body: &[u8]) -> serde_json::Result<Page> {
    serde_json::from_slice(body)
}
