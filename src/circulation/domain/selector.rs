use std::sync::Arc;
use chrono::NaiveDateTime;
use tracing::debug;
use crate::core::domain::Configuration;
use crate::core::library::LibraryError;
use crate::loans::dto::LoanDto;
use crate::patrons::dto::PatronDto;
use crate::policy::PolicyEvaluator;
use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto};

#[derive(Debug)]
pub enum SelectionOutcome {
    Selected { pool: LicensePoolDto, mechanism: Option<DeliveryMechanismDto> },
    NoneFound,
    // the most specific reason the last rejected pool could not be used
    Denied(LibraryError),
}

// ResourceSelector picks, among one title's pools, the one a patron should
// borrow from. It never fails; every outcome is a value.
pub struct ResourceSelector {
    evaluator: Arc<dyn PolicyEvaluator>,
}

impl ResourceSelector {
    pub fn new(evaluator: Arc<dyn PolicyEvaluator>) -> Self {
        Self { evaluator }
    }

    pub fn select(&self, candidates: &[LicensePoolDto], patron: &PatronDto, patron_loans: &[LoanDto],
                  requested_mechanism: Option<&str>, config: &Configuration, now: NaiveDateTime) -> SelectionOutcome {
        // one title, one loan, no matter how many licensors offer it
        if candidates.iter().any(|pool| patron_loans.iter().any(|loan| loan.pool_id == pool.pool_id)) {
            return SelectionOutcome::Denied(
                LibraryError::already_checked_out("You already have an active loan for this title."));
        }
        let mut best: Option<(&LicensePoolDto, Option<&DeliveryMechanismDto>)> = None;
        let mut last_denial = None;
        for pool in candidates {
            let decision = self.evaluator.evaluate(patron, pool, config, now);
            if let Some(denial) = decision.reason.filter(|_| !decision.allow) {
                debug!(pool_id = pool.pool_id.as_str(), denial = %denial, "pool denied by policy");
                last_denial = Some(LibraryError::policy_denied(denial));
                continue;
            }
            let mechanism = match requested_mechanism {
                Some(mechanism_id) => match pool.mechanism(mechanism_id) {
                    Some(mechanism) => Some(mechanism),
                    None => {
                        last_denial = Some(LibraryError::bad_delivery_mechanism(
                            format!("Cannot fulfill this title through delivery mechanism {}", mechanism_id).as_str()));
                        continue;
                    }
                },
                None => None,
            };
            let better = match best {
                None => true,
                Some((current, _)) => is_better(pool, current),
            };
            if better {
                best = Some((pool, mechanism));
            }
        }
        match (best, last_denial) {
            (Some((pool, mechanism)), _) => SelectionOutcome::Selected { pool: pool.clone(), mechanism: mechanism.cloned() },
            (None, Some(denial)) => SelectionOutcome::Denied(denial),
            (None, None) => SelectionOutcome::NoneFound,
        }
    }
}

// more copies first, then the shorter queue; a tie keeps the earlier pool
fn is_better(candidate: &LicensePoolDto, current: &LicensePoolDto) -> bool {
    let (a, b) = (candidate.effective_available(), current.effective_available());
    a > b || (a == b && candidate.patrons_in_hold_queue < current.patrons_in_hold_queue)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::Utc;
    use crate::circulation::domain::selector::{ResourceSelector, SelectionOutcome};
    use crate::core::domain::Configuration;
    use crate::core::library::{Audience, LibraryError, PolicyDenial};
    use crate::loans::dto::LoanDto;
    use crate::patrons::dto::PatronDto;
    use crate::policy::evaluator::DefaultPolicyEvaluator;
    use crate::works::dto::{DeliveryMechanismDto, LicensePoolDto, WorkDto};

    fn selector() -> ResourceSelector {
        ResourceSelector::new(Arc::new(DefaultPolicyEvaluator::default()))
    }

    fn pool(licensor: &str, available: i64, queue: i64) -> LicensePoolDto {
        let mut pool = LicensePoolDto::new("main", licensor, "ISBN", "9780441478125", WorkDto::new("The Word for World Is Forest", Audience::Adult));
        pool.licenses_owned = 5;
        pool.licenses_available = available;
        pool.patrons_in_hold_queue = queue;
        pool.delivery_mechanisms.push(DeliveryMechanismDto::new("epub", "application/epub+zip", Some("Adobe DRM")));
        pool
    }

    fn selected_licensor(outcome: SelectionOutcome) -> String {
        match outcome {
            SelectionOutcome::Selected { pool, .. } => pool.licensor,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_prefer_shorter_queue_on_equal_availability() {
        let pools = vec![pool("a", 2, 0), pool("b", 2, 1)];
        let outcome = selector().select(&pools, &PatronDto::new("main", "1"), &[], None, &Configuration::new("main"), Utc::now().naive_utc());
        assert_eq!("a", selected_licensor(outcome));
        let pools = vec![pool("b", 2, 1), pool("a", 2, 0)];
        let outcome = selector().select(&pools, &PatronDto::new("main", "1"), &[], None, &Configuration::new("main"), Utc::now().naive_utc());
        assert_eq!("a", selected_licensor(outcome));
    }

    #[tokio::test]
    async fn test_should_prefer_more_copies_over_queue() {
        let pools = vec![pool("a", 1, 5), pool("b", 2, 5)];
        let outcome = selector().select(&pools, &PatronDto::new("main", "1"), &[], None, &Configuration::new("main"), Utc::now().naive_utc());
        assert_eq!("b", selected_licensor(outcome));
    }

    #[tokio::test]
    async fn test_should_keep_first_pool_on_full_tie() {
        let pools = vec![pool("a", 1, 1), pool("b", 1, 1)];
        let outcome = selector().select(&pools, &PatronDto::new("main", "1"), &[], None, &Configuration::new("main"), Utc::now().naive_utc());
        assert_eq!("a", selected_licensor(outcome));
    }

    #[tokio::test]
    async fn test_should_fail_fast_when_already_checked_out() {
        let pools = vec![pool("a", 1, 0), pool("b", 3, 0)];
        let patron = PatronDto::new("main", "1");
        let loan = LoanDto::new(patron.patron_id.as_str(), &pools[1], Utc::now().naive_utc(), None);
        for order in [vec![pools[0].clone(), pools[1].clone()], vec![pools[1].clone(), pools[0].clone()]] {
            let outcome = selector().select(&order, &patron, &[loan.clone()], None, &Configuration::new("main"), Utc::now().naive_utc());
            assert!(matches!(outcome, SelectionOutcome::Denied(LibraryError::AlreadyCheckedOut { .. })));
        }
    }

    #[tokio::test]
    async fn test_should_never_pick_denied_pool() {
        let mut patron = PatronDto::new("main", "1");
        patron.external_type = Some("juvenile".to_string());
        let mut config = Configuration::new("main");
        config.lending_policy.audiences_by_external_type.insert("juvenile".to_string(), vec![Audience::Children]);
        let mut adult = pool("a", 5, 0);
        adult.work.audience = Audience::AdultsOnly;
        let mut children = pool("b", 1, 3);
        children.work.audience = Audience::Children;
        let outcome = selector().select(&[adult.clone(), children], &patron, &[], None, &config, Utc::now().naive_utc());
        assert_eq!("b", selected_licensor(outcome));

        let outcome = selector().select(&[adult], &patron, &[], None, &config, Utc::now().naive_utc());
        assert!(matches!(outcome, SelectionOutcome::Denied(LibraryError::PolicyDenied {
            denial: PolicyDenial::AudienceRestricted { .. } })));
    }

    #[tokio::test]
    async fn test_should_skip_pools_without_requested_mechanism() {
        let mut pdf = pool("a", 5, 0);
        pdf.delivery_mechanisms = vec![DeliveryMechanismDto::new("pdf", "application/pdf", None)];
        let epub = pool("b", 1, 0);
        let outcome = selector().select(&[pdf.clone(), epub], &PatronDto::new("main", "1"), &[], Some("epub"),
                                        &Configuration::new("main"), Utc::now().naive_utc());
        match outcome {
            SelectionOutcome::Selected { pool, mechanism } => {
                assert_eq!("b", pool.licensor.as_str());
                assert_eq!(Some("epub".to_string()), mechanism.map(|m| m.mechanism_id));
            }
            other => panic!("unexpected {:?}", other),
        }
        let outcome = selector().select(&[pdf], &PatronDto::new("main", "1"), &[], Some("epub"),
                                        &Configuration::new("main"), Utc::now().naive_utc());
        assert!(matches!(outcome, SelectionOutcome::Denied(LibraryError::BadDeliveryMechanism { .. })));
    }

    #[tokio::test]
    async fn test_should_report_none_found_without_candidates() {
        let outcome = selector().select(&[], &PatronDto::new("main", "1"), &[], None, &Configuration::new("main"), Utc::now().naive_utc());
        assert!(matches!(outcome, SelectionOutcome::NoneFound));
    }

    #[tokio::test]
    async fn test_should_rank_open_access_first() {
        let mut open = pool("oa", 0, 0);
        open.open_access = true;
        let outcome = selector().select(&[pool("a", 3, 0), open], &PatronDto::new("main", "1"), &[], None,
                                        &Configuration::new("main"), Utc::now().naive_utc());
        assert_eq!("oa", selected_licensor(outcome));
    }
}
