//! In-memory school repository implementation

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::pagination::paginate;
use crate::domain::{
    school_unique_key, DomainError, OpContext, School, SchoolFilters, SchoolId, SchoolRepository,
};
use crate::infrastructure::storage::InMemoryStore;

/// In-memory implementation of SchoolRepository
#[derive(Debug, Clone, Default)]
pub struct InMemorySchoolRepository {
    store: InMemoryStore,
}

impl InMemorySchoolRepository {
    /// Create a repository over `store`; use [`InMemoryStore::schools`] to
    /// share the store with the other repositories
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn sorted(mut schools: Vec<School>) -> Vec<School> {
    schools.sort_by(|a, b| {
        (a.name(), a.address().city(), a.address().state()).cmp(&(
            b.name(),
            b.address().city(),
            b.address().state(),
        ))
    });
    schools
}

fn duplicate(school: &School) -> DomainError {
    let message = format!(
        "School '{}' already exists in {}, {}",
        school.name(),
        school.address().city(),
        school.address().state()
    );
    warn!(school_id = %school.id(), %message, "Rejected duplicate school");
    DomainError::duplicate_key(message)
}

#[async_trait]
impl SchoolRepository for InMemorySchoolRepository {
    async fn create(&self, ctx: &OpContext, school: &School) -> Result<(), DomainError> {
        school.validate_invariants()?;

        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            let key = school.unique_key();

            if state.schools.contains_key(school.id()) || state.school_keys.contains_key(&key) {
                return Err(duplicate(school));
            }

            state.school_keys.insert(key, *school.id());
            state.schools.insert(*school.id(), school.clone());

            debug!(school_id = %school.id(), name = school.name(), "Created school");
            Ok(())
        })
        .await
    }

    async fn get_by_id(&self, ctx: &OpContext, id: &SchoolId) -> Result<School, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            state
                .schools
                .get(id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("School '{}' not found", id)))
        })
        .await
    }

    async fn get_by_name_city_state(
        &self,
        ctx: &OpContext,
        name: &str,
        city: &str,
        state: &str,
    ) -> Result<School, DomainError> {
        let key = school_unique_key(name, city, state);

        ctx.run(async {
            let guard = self.store.state().read().await;

            guard
                .school_keys
                .get(&key)
                .and_then(|id| guard.schools.get(id))
                .cloned()
                .ok_or_else(|| {
                    DomainError::not_found(format!(
                        "School '{}' not found in {}, {}",
                        name.trim(),
                        city.trim(),
                        state.trim()
                    ))
                })
        })
        .await
    }

    async fn update(&self, ctx: &OpContext, school: &School) -> Result<(), DomainError> {
        school.validate_invariants()?;

        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            let old_key = match state.schools.get(school.id()) {
                Some(existing) => existing.unique_key(),
                None => {
                    return Err(DomainError::not_found(format!(
                        "School '{}' not found",
                        school.id()
                    )));
                }
            };

            let new_key = school.unique_key();

            if let Some(owner) = state.school_keys.get(&new_key) {
                if owner != school.id() {
                    return Err(duplicate(school));
                }
            }

            if old_key != new_key {
                state.school_keys.remove(&old_key);
                state.school_keys.insert(new_key, *school.id());
            }
            state.schools.insert(*school.id(), school.clone());

            debug!(school_id = %school.id(), "Updated school");
            Ok(())
        })
        .await
    }

    async fn delete(&self, ctx: &OpContext, id: &SchoolId) -> Result<(), DomainError> {
        ctx.run(async {
            let mut state = self.store.state().write().await;
            ctx.check()?;

            if !state.schools.contains_key(id) {
                return Err(DomainError::not_found(format!("School '{}' not found", id)));
            }

            if state.school_has_teachers(id) {
                let message = format!("School '{}' is still referenced by teachers", id);
                warn!(school_id = %id, %message, "Rejected school deletion");
                return Err(DomainError::foreign_key(message));
            }

            if let Some(school) = state.schools.remove(id) {
                state.school_keys.remove(&school.unique_key());
            }

            debug!(school_id = %id, "Deleted school");
            Ok(())
        })
        .await
    }

    async fn get_all(&self, ctx: &OpContext) -> Result<Vec<School>, DomainError> {
        self.list(ctx, &SchoolFilters::default()).await
    }

    async fn list(
        &self,
        ctx: &OpContext,
        filters: &SchoolFilters,
    ) -> Result<Vec<School>, DomainError> {
        ctx.run(async {
            let state = self.store.state().read().await;

            let matching = state
                .schools
                .values()
                .filter(|s| filters.matches(s))
                .cloned()
                .collect();

            Ok(paginate(sorted(matching), filters.offset, filters.limit))
        })
        .await
    }

    async fn search(
        &self,
        ctx: &OpContext,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<School>, DomainError> {
        let needle = query.trim().to_lowercase();

        ctx.run(async {
            let state = self.store.state().read().await;

            let matching = state
                .schools
                .values()
                .filter(|s| {
                    [s.name(), s.address().city(), s.address().state()]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect();

            Ok(paginate(sorted(matching), None, limit))
        })
        .await
    }
}
