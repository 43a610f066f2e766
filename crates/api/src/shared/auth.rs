use crate::error::DuesoonError;
use actix_web::HttpRequest;
use duesoon_infra::DuesoonContext;

const API_KEY_HEADER: &str = "x-api-key";

/// Operator routes require the configured admin api key in the `x-api-key` header
pub fn protect_admin_route(req: &HttpRequest, ctx: &DuesoonContext) -> Result<(), DuesoonError> {
    let api_key = match req.headers().get(API_KEY_HEADER) {
        Some(api_key) => match api_key.to_str() {
            Ok(api_key) => api_key,
            Err(_) => {
                return Err(DuesoonError::Unauthorized(
                    "Malformed api key provided".to_string(),
                ))
            }
        },
        None => {
            return Err(DuesoonError::Unauthorized(
                "Unable to find api-key in x-api-key header".to_string(),
            ))
        }
    };

    if api_key == ctx.config.admin_api_key {
        Ok(())
    } else {
        Err(DuesoonError::Unauthorized(
            "Invalid api-key provided in x-api-key header".to_string(),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::test::TestRequest;

    fn setup_ctx() -> DuesoonContext {
        let mut ctx = DuesoonContext::create_inmemory();
        ctx.config.admin_api_key = "operator-secret".into();
        ctx
    }

    #[actix_web::test]
    async fn accepts_the_admin_api_key() {
        let ctx = setup_ctx();
        let req = TestRequest::default()
            .insert_header(("x-api-key", "operator-secret"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_ok());
    }

    #[actix_web::test]
    async fn rejects_a_wrong_api_key() {
        let ctx = setup_ctx();
        let req = TestRequest::default()
            .insert_header(("x-api-key", "guess"))
            .to_http_request();
        assert!(matches!(
            protect_admin_route(&req, &ctx),
            Err(DuesoonError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn rejects_a_missing_api_key() {
        let ctx = setup_ctx();
        let req = TestRequest::default().to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());
    }
}
