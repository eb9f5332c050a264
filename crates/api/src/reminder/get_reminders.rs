use crate::{
    error::LullError,
    shared::{
        auth::protect_owner_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use lull_api_structs::get_reminders::*;
use lull_domain::ReminderEvent;
use lull_infra::LullContext;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<LullContext>,
) -> Result<HttpResponse, LullError> {
    let owner_ref = protect_owner_route(&http_req)?;

    let usecase = GetRemindersUseCase {
        owner_ref,
        limit: query_params.limit,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(|_| LullError::InternalError)
}

/// The owner's most recent reminders, newest first
#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub owner_ref: String,
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl GetRemindersUseCase {
    fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).max(1).min(MAX_LIMIT)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<ReminderEvent>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &LullContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .list_recent_by_owner(&self.owner_ref, self.effective_limit())
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lull_domain::{Complexity, EventStatus, TriggerBucket, TriggerIntent, ID};

    fn event(owner_ref: &str, created: i64) -> ReminderEvent {
        ReminderEvent {
            id: ID::unassigned(),
            owner_ref: owner_ref.into(),
            raw_input: format!("reminder {}", created),
            event_ts: created + 2_000,
            trigger_ts: created + 1_000,
            status: EventStatus::Silent,
            bucket: TriggerBucket::M5,
            intent: TriggerIntent::Cushion,
            complexity: Complexity::Medium,
            prep_required: false,
            dependencies: Vec::new(),
            reason: String::new(),
            feedback: None,
            created,
        }
    }

    #[test]
    fn limit_is_clamped() {
        let usecase = |limit| GetRemindersUseCase {
            owner_ref: "ann@example.com".into(),
            limit,
        };
        assert_eq!(usecase(None).effective_limit(), 10);
        assert_eq!(usecase(Some(0)).effective_limit(), 1);
        assert_eq!(usecase(Some(-3)).effective_limit(), 1);
        assert_eq!(usecase(Some(25)).effective_limit(), 25);
        assert_eq!(usecase(Some(500)).effective_limit(), 50);
    }

    #[actix_web::main]
    #[test]
    async fn lists_own_reminders_newest_first() {
        let ctx = LullContext::create_inmemory();
        for created in 0..15 {
            ctx.repos
                .events
                .insert(&event("ann@example.com", created))
                .await
                .unwrap();
        }
        ctx.repos
            .events
            .insert(&event("bob@example.com", 100))
            .await
            .unwrap();

        let usecase = GetRemindersUseCase {
            owner_ref: "ann@example.com".into(),
            limit: None,
        };
        let reminders = execute(usecase, &ctx).await.unwrap();
        assert_eq!(reminders.len(), 10);
        assert_eq!(reminders[0].created, 14);
        assert_eq!(reminders[9].created, 5);
        assert!(reminders.iter().all(|r| r.owner_ref == "ann@example.com"));
    }
}
