use crate::error::LullError;
use actix_web::HttpRequest;
use lull_infra::LullContext;
use lull_utils::secrets_match;

/// Resolved identity of the caller. Set by the gateway in front of this service.
pub const OWNER_HEADER: &str = "lull-owner";
pub const ADMIN_KEY_HEADER: &str = "lull-admin-key";

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Returns the owner the request acts on behalf of
pub fn protect_owner_route(req: &HttpRequest) -> Result<String, LullError> {
    header_value(req, OWNER_HEADER)
        .map(String::from)
        .ok_or_else(|| {
            LullError::Unauthorized(format!("Missing the `{}` header", OWNER_HEADER))
        })
}

pub fn protect_admin_route(req: &HttpRequest, ctx: &LullContext) -> Result<(), LullError> {
    match header_value(req, ADMIN_KEY_HEADER) {
        Some(key) if secrets_match(key, &ctx.config.admin_secret_key) => Ok(()),
        Some(_) => Err(LullError::Unauthorized("Invalid admin key".into())),
        None => Err(LullError::Unauthorized(format!(
            "Missing the `{}` header",
            ADMIN_KEY_HEADER
        ))),
    }
}
