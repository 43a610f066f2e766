use super::ReminderScheduler;
use crate::{
    error::DuesoonError,
    shared::{
        auth::protect_admin_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use duesoon_api_structs::run_reminder_pass::*;
use duesoon_domain::{
    HorizonPolicy, ReminderCadence, ReminderHours, ReminderPassSummary, MAX_COOLDOWN_HOURS,
};
use duesoon_infra::DuesoonContext;

/// Manual trigger for a reminder pass, used by operators and external cron
pub async fn run_reminder_pass_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<DuesoonContext>,
) -> Result<HttpResponse, DuesoonError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = RunReminderPassUseCase {
        cadence: body.cadence,
        horizon_hours: body.horizon_hours,
        cooldown_hours: body.cooldown_hours,
    };

    execute(usecase, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(APIResponse::new(summary)))
        .map_err(DuesoonError::from)
}

#[derive(Debug)]
pub struct RunReminderPassUseCase {
    pub cadence: Option<ReminderCadence>,
    pub horizon_hours: Option<i64>,
    pub cooldown_hours: Option<i64>,
}

#[derive(Debug)]
pub enum UseCaseError {
    MissingCooldown,
    InvalidCooldown(i64),
    InvalidHorizon(i64),
    PassFailed,
}

impl From<UseCaseError> for DuesoonError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingCooldown => Self::BadClientData(
                "Either a cadence or cooldownHours must be provided".into(),
            ),
            UseCaseError::InvalidCooldown(hours) => Self::BadClientData(format!(
                "cooldownHours must be between 0 and {}, got: {}",
                MAX_COOLDOWN_HOURS, hours
            )),
            UseCaseError::InvalidHorizon(hours) => Self::BadClientData(format!(
                "horizonHours must be between 1 and 168, got: {}",
                hours
            )),
            UseCaseError::PassFailed => Self::InternalError,
        }
    }
}

impl RunReminderPassUseCase {
    fn pass_parameters(&self) -> Result<(HorizonPolicy, i64), UseCaseError> {
        if let Some(cadence) = self.cadence {
            return Ok((cadence.horizon(), cadence.cooldown_hours()));
        }
        let cooldown_hours = self.cooldown_hours.ok_or(UseCaseError::MissingCooldown)?;
        if !(0..=MAX_COOLDOWN_HOURS).contains(&cooldown_hours) {
            return Err(UseCaseError::InvalidCooldown(cooldown_hours));
        }
        let horizon = match self.horizon_hours {
            Some(hours) => HorizonPolicy::Fixed(
                ReminderHours::new(hours).map_err(|_| UseCaseError::InvalidHorizon(hours))?,
            ),
            None => HorizonPolicy::SubscriptionPreference,
        };
        Ok((horizon, cooldown_hours))
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunReminderPassUseCase {
    type Response = ReminderPassSummary;
    type Error = UseCaseError;

    const NAME: &'static str = "RunReminderPass";

    async fn execute(&mut self, ctx: &DuesoonContext) -> Result<Self::Response, Self::Error> {
        let (horizon, cooldown_hours) = self.pass_parameters()?;

        ReminderScheduler::new(ctx)
            .run_reminder_pass(horizon, cooldown_hours)
            .await
            .map_err(|_| UseCaseError::PassFailed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase(
        cadence: Option<ReminderCadence>,
        horizon_hours: Option<i64>,
        cooldown_hours: Option<i64>,
    ) -> RunReminderPassUseCase {
        RunReminderPassUseCase {
            cadence,
            horizon_hours,
            cooldown_hours,
        }
    }

    #[test]
    fn cadence_wins_over_explicit_parameters() {
        let (horizon, cooldown) = usecase(Some(ReminderCadence::Urgent), Some(100), Some(0))
            .pass_parameters()
            .unwrap();
        assert_eq!(horizon, ReminderCadence::Urgent.horizon());
        assert_eq!(cooldown, 2);
    }

    #[test]
    fn explicit_parameters_are_validated() {
        assert!(matches!(
            usecase(None, Some(24), None).pass_parameters(),
            Err(UseCaseError::MissingCooldown)
        ));
        assert!(matches!(
            usecase(None, Some(0), Some(1)).pass_parameters(),
            Err(UseCaseError::InvalidHorizon(0))
        ));
        assert!(matches!(
            usecase(None, Some(24), Some(-1)).pass_parameters(),
            Err(UseCaseError::InvalidCooldown(-1))
        ));
        assert!(matches!(
            usecase(None, None, Some(10_000_000_000_000)).pass_parameters(),
            Err(UseCaseError::InvalidCooldown(10_000_000_000_000))
        ));
        assert!(usecase(None, None, Some(MAX_COOLDOWN_HOURS))
            .pass_parameters()
            .is_ok());
        let (horizon, cooldown) = usecase(None, None, Some(6)).pass_parameters().unwrap();
        assert_eq!(horizon, HorizonPolicy::SubscriptionPreference);
        assert_eq!(cooldown, 6);
    }

    #[actix_web::test]
    async fn runs_a_pass_with_nothing_to_do() {
        let ctx = DuesoonContext::create_inmemory();
        let res = execute(usecase(Some(ReminderCadence::Routine), None, None), &ctx)
            .await
            .unwrap();
        assert_eq!(res, ReminderPassSummary::new(0));
    }
}
