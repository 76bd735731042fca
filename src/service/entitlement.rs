use chrono::{Datelike, Days, NaiveDate};
use sea_orm::DatabaseConnection;

use crate::{
    config::Config,
    data::{
        usage::{UsageRepository, METRIC_MASS_OFFER_DAY, METRIC_MASS_OFFER_WEEKFREE},
        user::UserRepository,
    },
};

/// Plan capability table. Adjust here when pricing changes.
struct PlanRules {
    plan_key: &'static str,
    league_cap: u32,
    mass_offer_daily_cap: u32,
    aggregate_showdown: bool,
    saved_presets: bool,
}

const PLAN_RULES: [PlanRules; 5] = [
    PlanRules {
        plan_key: "free",
        league_cap: 3,
        mass_offer_daily_cap: 0,
        aggregate_showdown: false,
        saved_presets: false,
    },
    PlanRules {
        plan_key: "mgr5",
        league_cap: 5,
        mass_offer_daily_cap: 3,
        aggregate_showdown: true,
        saved_presets: true,
    },
    PlanRules {
        plan_key: "mgr12",
        league_cap: 12,
        mass_offer_daily_cap: 9999,
        aggregate_showdown: true,
        saved_presets: true,
    },
    PlanRules {
        plan_key: "unlimited",
        league_cap: 9999,
        mass_offer_daily_cap: 9999,
        aggregate_showdown: true,
        saved_presets: true,
    },
    // Same as unlimited, but time-boxed by founder_expires_at.
    PlanRules {
        plan_key: "founder",
        league_cap: 9999,
        mass_offer_daily_cap: 9999,
        aggregate_showdown: true,
        saved_presets: true,
    },
];

fn rules_for(plan_key: &str) -> &'static PlanRules {
    PLAN_RULES
        .iter()
        .find(|rules| rules.plan_key == plan_key)
        .unwrap_or(&PLAN_RULES[0])
}

/// Effective, plan-derived capabilities for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlements {
    pub plan_key: String,
    pub league_cap: u32,
    pub mass_offer_daily_cap: u32,
    pub aggregate_showdown: bool,
    pub saved_presets: bool,
}

/// Outcome of a quota check. Denial is a value, not an error: the caller
/// short-circuits the send path and shows the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }
}

pub struct EntitlementService<'a> {
    db: &'a DatabaseConnection,
    config: &'a Config,
}

impl<'a> EntitlementService<'a> {
    pub fn new(db: &'a DatabaseConnection, config: &'a Config) -> Self {
        Self { db, config }
    }

    /// Compute effective entitlements. An expired founder plan falls back to
    /// free; a per-user daily-cap override takes precedence over the plan's.
    pub fn entitlements_for(&self, user: &entity::user::Model, today: NaiveDate) -> Entitlements {
        let mut plan_key = user.plan.as_str();
        if plan_key == "founder" {
            let active = user
                .founder_expires_at
                .map(|expires| expires.date() >= today)
                .unwrap_or(false);
            if !active {
                plan_key = "free";
            }
        }

        let rules = rules_for(plan_key);
        let daily_cap = user
            .mass_offer_daily_cap
            .map(|cap| cap.max(0) as u32)
            .unwrap_or(rules.mass_offer_daily_cap);

        Entitlements {
            plan_key: rules.plan_key.to_string(),
            league_cap: rules.league_cap,
            mass_offer_daily_cap: daily_cap,
            aggregate_showdown: rules.aggregate_showdown,
            saved_presets: rules.saved_presets,
        }
    }

    /// Whether the user may link/sync another league.
    pub fn within_league_cap(
        &self,
        user: &entity::user::Model,
        current_league_count: u32,
        today: NaiveDate,
    ) -> bool {
        current_league_count < self.entitlements_for(user, today).league_cap
    }

    /// Enforce mass-offer limits for one send action and update counters.
    ///
    /// A batch of N simultaneous offers consumes exactly one unit of quota;
    /// `recipients_count` only feeds the free tier's recipient cap.
    pub async fn consume_mass_offer(
        &self,
        user: &entity::user::Model,
        recipients_count: u32,
        today: NaiveDate,
    ) -> Result<Decision, sea_orm::DbErr> {
        let entitlements = self.entitlements_for(user, today);
        let usage = UsageRepository::new(self.db);

        if entitlements.plan_key == "free" {
            let recipients_cap = self.config.free_recipients_cap;
            if recipients_count > recipients_cap {
                return Ok(Decision::denied(format!(
                    "Free plan limit is {recipients_cap} recipients per mass send. Upgrade to send to all."
                )));
            }

            let week_key = week_monday_key(today).to_string();
            let used = usage
                .get(user.id, METRIC_MASS_OFFER_WEEKFREE, &week_key)
                .await?;
            if used >= self.config.free_weekly_allowance as i32 {
                return Ok(Decision::denied(
                    "You've used your weekly free mass offer. Upgrade to send more.",
                ));
            }

            // Reserve the weekly free now.
            usage
                .set(user.id, METRIC_MASS_OFFER_WEEKFREE, &week_key, 1)
                .await?;
            return Ok(Decision::Allowed);
        }

        let daily_cap = entitlements.mass_offer_daily_cap;
        let day_key = today.to_string();

        if daily_cap > 0 {
            let used_today = usage.get(user.id, METRIC_MASS_OFFER_DAY, &day_key).await?;
            if (used_today as u32) < daily_cap {
                usage
                    .increment(user.id, METRIC_MASS_OFFER_DAY, &day_key, 1)
                    .await?;
                return Ok(Decision::Allowed);
            }

            if user.bonus_mass_offers > 0 {
                UserRepository::new(self.db)
                    .set_bonus_offers(user.id, user.bonus_mass_offers - 1)
                    .await?;
                return Ok(Decision::Allowed);
            }

            return Ok(Decision::denied(format!(
                "Daily mass-offer cap reached ({daily_cap}). Try again tomorrow or upgrade your plan."
            )));
        }

        // Paid plan with no configured daily cap: misconfiguration guard,
        // fall through to the bonus balance.
        if user.bonus_mass_offers > 0 {
            UserRepository::new(self.db)
                .set_bonus_offers(user.id, user.bonus_mass_offers - 1)
                .await?;
            return Ok(Decision::Allowed);
        }

        Ok(Decision::denied(
            "Your plan does not allow mass offers. Upgrade to enable this feature.",
        ))
    }
}

/// Monday of the ISO week containing `date`, the period key for the free
/// tier's weekly allowance.
pub fn week_monday_key(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}
