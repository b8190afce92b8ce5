use chrono::NaiveDateTime;
use crate::core::domain::Configuration;
use crate::core::library::PolicyDenial;
use crate::patrons::Patron;
use crate::policy::{Decision, PolicyEvaluator};
use crate::works::dto::LicensePoolDto;

// DefaultPolicyEvaluator applies, in order: card expiry, block, fine ceiling,
// audience restrictions, and whether the library allows holds at all.
#[derive(Debug, Clone, Default)]
pub struct DefaultPolicyEvaluator {}

impl PolicyEvaluator for DefaultPolicyEvaluator {
    fn evaluate(&self, patron: &dyn Patron, pool: &LicensePoolDto,
                config: &Configuration, now: NaiveDateTime) -> Decision {
        if patron.is_expired(now) {
            return Decision::deny(PolicyDenial::Expired { expired_at: patron.authorization_expires() });
        }
        if patron.is_blocked(now) {
            return Decision::deny(PolicyDenial::Blocked {
                reason: patron.block_reason().unwrap_or_default(),
                unblock_at: patron.blocked_until(),
            });
        }
        if let Some(limit) = config.fine_ceiling {
            if patron.fines() > limit {
                return Decision::deny(PolicyDenial::FinesExceeded { fines: patron.fines(), limit });
            }
        }
        if !config.lending_policy.allows(patron.external_type().as_deref(), pool.work.audience) {
            return Decision::deny(PolicyDenial::AudienceRestricted { audience: pool.work.audience });
        }
        if !pool.has_copies() && !config.allow_holds {
            return Decision::deny(PolicyDenial::HoldsDisabled);
        }
        Decision::allow()
    }
}
