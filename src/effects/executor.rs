//! Executes transitions against entities.

use crate::effects::services::{FromServices, Services};
use crate::effects::transition::{FromEntity, Transition, TransitionError};
use crate::entity::HasStates;
use tracing::debug;

/// Run a pre-built transition.
///
/// Order: guard, then dependency resolution, then the handler. A rejected
/// guard fails with [`TransitionError::CannotTransition`] before anything is
/// touched. Whatever the handler returns is passed back unchanged; nothing
/// is persisted or rolled back here.
pub fn execute<E, T>(
    entity: &mut E,
    transition: T,
    services: &Services,
) -> Result<T::Output, TransitionError>
where
    E: HasStates,
    T: Transition<E>,
{
    let name = transition.name();

    if !transition.can_transition(entity) {
        let described = entity.describe();
        debug!(transition = %name, entity = %described, "transition rejected by guard");
        return Err(TransitionError::CannotTransition {
            transition: name,
            entity: described,
        });
    }

    let deps = <T::Deps<'_> as FromServices<'_>>::from_services(services).map_err(|missing| {
        TransitionError::DependencyResolution {
            transition: name.clone(),
            dependency: missing.dependency,
        }
    })?;

    let result = transition.handle(entity, deps);
    match &result {
        Ok(_) => debug!(transition = %name, entity = %entity.describe(), "transition applied"),
        Err(err) => debug!(transition = %name, error = %err, "transition handler failed"),
    }
    result
}

/// Build a transition from the entity and `args`, then run it.
pub fn execute_with<E, T>(
    entity: &mut E,
    args: T::Args,
    services: &Services,
) -> Result<T::Output, TransitionError>
where
    E: HasStates,
    T: FromEntity<E>,
{
    let transition = T::construct(entity, args);
    execute(entity, transition, services)
}
