//! stats command - prints record counts

use serde::Serialize;

use crate::domain::{OpContext, TeacherFilters, TeacherStatus};
use crate::infrastructure::storage::Registry;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TeacherCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Approved with a wishlist
    pub active: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub schools: usize,
    pub teachers: TeacherCounts,
    pub admins: usize,
}

/// Count the records held by `registry`
pub async fn collect(ctx: &OpContext, registry: &Registry) -> anyhow::Result<Stats> {
    let count_status = |status: TeacherStatus| async move {
        registry
            .teachers
            .list(ctx, &TeacherFilters::with_status(status))
            .await
            .map(|teachers| teachers.len())
    };

    Ok(Stats {
        schools: registry.schools.get_all(ctx).await?.len(),
        teachers: TeacherCounts {
            pending: count_status(TeacherStatus::Pending).await?,
            approved: count_status(TeacherStatus::Approved).await?,
            rejected: count_status(TeacherStatus::Rejected).await?,
            active: registry.teachers.get_active_teachers(ctx).await?.len(),
        },
        admins: registry.admins.count(ctx).await?,
    })
}

pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    let registry = super::open_registry(&config).await?;
    let ctx = config.storage.operation_context();

    let stats = collect(&ctx, &registry).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::shared::{Address, Location};
    use crate::domain::{Admin, School, Teacher};
    use crate::infrastructure::admin::Argon2Hasher;
    use crate::infrastructure::storage::{InMemoryStore, RegistryFactory};

    #[tokio::test]
    async fn test_collect_counts() {
        let registry =
            RegistryFactory::create_in_memory(&InMemoryStore::new(), Arc::new(Argon2Hasher::new()));
        let ctx = OpContext::background();

        let address = Address::new("", "Springfield", "IL", "", Location::default()).unwrap();
        let school = School::new("Lincoln", address).unwrap();
        registry.schools.create(&ctx, &school).await.unwrap();

        let mut approved = Teacher::new("a@school.org", "A", "A", *school.id(), "").unwrap();
        approved
            .update_wishlist_url("https://www.amazon.com/hz/wishlist/ls/1")
            .unwrap();
        approved.approve().unwrap();
        let pending = Teacher::new("b@school.org", "B", "B", *school.id(), "").unwrap();
        registry.teachers.create(&ctx, &approved).await.unwrap();
        registry.teachers.create(&ctx, &pending).await.unwrap();

        registry
            .admins
            .create(&ctx, &Admin::with_hash("operator", "hash").unwrap())
            .await
            .unwrap();

        let stats = collect(&ctx, &registry).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                schools: 1,
                teachers: TeacherCounts {
                    pending: 1,
                    approved: 1,
                    rejected: 0,
                    active: 1,
                },
                admins: 1,
            }
        );

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["teachers"]["approved"], 1);
    }
}
