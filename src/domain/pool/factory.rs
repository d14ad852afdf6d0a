use std::sync::Arc;

use tracing::debug;

use super::rewards_pool::RewardsPool;
use super::variant::RewardVariant;
use crate::domain::registry::{Cohort, PoolRegistry};
use crate::infrastructure::chain::Connection;
use crate::shared::types::PoolDescriptor;

/// Factory for creating rewards pools
///
/// Nothing is cached: every call binds fresh contract handles.
#[derive(Debug, Clone)]
pub struct RewardsPoolFactory {
    registry: Arc<PoolRegistry>,
}

impl RewardsPoolFactory {
    pub fn new(registry: Arc<PoolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// Create a pool with the variant selected by the descriptor's pool type
    pub fn from_pool(&self, descriptor: &PoolDescriptor, connection: &Arc<dyn Connection>) -> RewardsPool {
        let variant = RewardVariant::from_pool_type(descriptor.pool_type.as_deref());
        debug!("Binding {} pool at {}", variant, descriptor.address);
        RewardsPool::new(
            descriptor.clone(),
            variant,
            Arc::clone(connection),
            Arc::clone(&self.registry),
        )
    }

    /// Create every pool in `cohort`, in registry order
    pub fn cohort(&self, cohort: Cohort, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.registry
            .cohort(cohort)
            .iter()
            .map(|descriptor| self.from_pool(descriptor, connection))
            .collect()
    }

    pub fn known_pools(&self, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.cohort(Cohort::Known, connection)
    }

    pub fn week_one(&self, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.cohort(Cohort::WeekOne, connection)
    }

    pub fn week_two(&self, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.cohort(Cohort::WeekTwo, connection)
    }

    pub fn active_pools(&self, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.cohort(Cohort::Active, connection)
    }

    pub fn inactive_pools(&self, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.cohort(Cohort::Inactive, connection)
    }

    pub fn all_past_pools(&self, connection: &Arc<dyn Connection>) -> Vec<RewardsPool> {
        self.cohort(Cohort::Past, connection)
    }

    /// Get all available reward variants
    pub fn available_variants() -> Vec<RewardVariant> {
        vec![RewardVariant::AutoCompounding, RewardVariant::Harvest]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pool::fixtures::*;
    use alloy_primitives::{Address, U256};

    fn addresses(pools: &[RewardsPool]) -> Vec<Address> {
        pools.iter().map(|pool| pool.address()).collect()
    }

    #[test]
    fn test_from_pool_selects_variant() {
        let (_, factory, connection) = setup(snapshot());
        let registry = factory.registry();

        let cases = [
            (HARVEST_POOL, RewardVariant::Harvest),
            (AUTO_POOL, RewardVariant::AutoCompounding),
            (BOOSTED_POOL, RewardVariant::Harvest),
            (PAST_POOL, RewardVariant::Harvest),
        ];
        for (address, expected) in cases {
            let pool = factory.from_pool(registry.find(&address).unwrap(), &connection);
            assert_eq!(pool.variant(), expected, "pool {}", address);
        }
    }

    #[tokio::test]
    async fn test_auto_compounding_ignores_contract_rewards() {
        let mut snapshot = snapshot();
        snapshot
            .pools
            .get_mut(&AUTO_POOL)
            .unwrap()
            .earned
            .insert(USER, U256::MAX);
        let (_, factory, connection) = setup(snapshot);

        let pool = factory.from_pool(factory.registry().find(&AUTO_POOL).unwrap(), &connection);
        assert_eq!(pool.earned_rewards(USER).await.unwrap(), U256::ZERO);
    }

    #[test]
    fn test_cohort_accessors() {
        let (_, factory, connection) = setup(snapshot());

        assert_eq!(
            addresses(&factory.known_pools(&connection)),
            vec![HARVEST_POOL, AUTO_POOL, BOOSTED_POOL]
        );
        assert_eq!(addresses(&factory.week_one(&connection)), vec![HARVEST_POOL]);
        assert_eq!(addresses(&factory.week_two(&connection)), vec![AUTO_POOL, BOOSTED_POOL]);
        assert_eq!(
            addresses(&factory.active_pools(&connection)),
            vec![HARVEST_POOL, BOOSTED_POOL]
        );
        assert_eq!(addresses(&factory.inactive_pools(&connection)), vec![AUTO_POOL]);
        assert_eq!(addresses(&factory.all_past_pools(&connection)), vec![PAST_POOL]);
    }

    #[test]
    fn test_cohort_calls_return_fresh_instances() {
        let (_, factory, connection) = setup(snapshot());

        let first = factory.active_pools(&connection);
        let second = factory.active_pools(&connection);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.descriptor(), b.descriptor());
            assert_eq!(a.variant(), b.variant());
            assert_eq!(a.name(), b.name());
            assert!(!Arc::ptr_eq(a.contract(), b.contract()));
            assert!(!Arc::ptr_eq(a.lptoken(), b.lptoken()));
        }
    }

    #[test]
    fn test_available_variants() {
        let variants = RewardsPoolFactory::available_variants();
        assert!(variants.contains(&RewardVariant::Harvest));
        assert!(variants.contains(&RewardVariant::AutoCompounding));
    }
}
