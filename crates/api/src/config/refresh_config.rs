use crate::{
    error::LullError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use lull_api_structs::refresh_config::*;
use lull_infra::LullContext;

pub async fn refresh_config_controller(
    http_req: HttpRequest,
    ctx: web::Data<LullContext>,
) -> Result<HttpResponse, LullError> {
    protect_admin_route(&http_req, &ctx)?;

    execute(RefreshConfigUseCase, &ctx)
        .await
        .map(|entries| HttpResponse::Ok().json(APIResponse { entries }))
        .map_err(|_| LullError::InternalError)
}

/// Reloads prompts and other tunables from the store. A failed reload keeps
/// the entries that were cached before.
#[derive(Debug)]
pub struct RefreshConfigUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for RefreshConfigUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "RefreshConfig";

    async fn execute(&mut self, ctx: &LullContext) -> Result<Self::Response, Self::Error> {
        ctx.prompts
            .refresh()
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lull_infra::{AppConfigEntry, DEFAULT_PARSER_PROMPT, PARSER_PROMPT_KEY};

    #[actix_web::main]
    #[test]
    async fn picks_up_new_prompts() {
        let ctx = LullContext::create_inmemory();
        assert_eq!(ctx.prompts.parser_prompt(), DEFAULT_PARSER_PROMPT);

        ctx.repos
            .app_config
            .upsert(&AppConfigEntry {
                key: PARSER_PROMPT_KEY.into(),
                value: "Now is {currentTime}. Reply in JSON.".into(),
                description: None,
            })
            .await
            .unwrap();
        // Not visible until refreshed
        assert_eq!(ctx.prompts.parser_prompt(), DEFAULT_PARSER_PROMPT);

        let entries = execute(RefreshConfigUseCase, &ctx).await.unwrap();
        assert_eq!(entries, 1);
        assert_eq!(ctx.prompts.parser_prompt(), "Now is {currentTime}. Reply in JSON.");
    }
}
