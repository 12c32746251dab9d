/// ECS world: entity and component storage.
///
/// Components are stored as trait objects in one [`ComponentGroup`] per
/// concrete type. Groups are kept in the order their type was first
/// inserted, and components within a group in allocation order, so walking
/// the world is deterministic.
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use engine_component::{Component, ComponentId, Entity, IdAllocator};
use engine_math::Transform;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("{0} not found")]
    EntityNotFound(Entity),
}

/// Per-entity data.
#[derive(Debug, Clone, Default)]
pub struct EntityData {
    pub transform: Transform,
    /// Attached components, in attachment order.
    pub components: Vec<ComponentId>,
}

/// One stored component together with its identity and owner.
#[derive(Debug)]
pub struct ComponentSlot {
    pub id: ComponentId,
    pub owner: Entity,
    pub component: Box<dyn Component>,
}

/// All components of one concrete type.
#[derive(Debug)]
pub struct ComponentGroup {
    type_name: &'static str,
    slots: BTreeMap<ComponentId, ComponentSlot>,
}

impl ComponentGroup {
    fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            slots: BTreeMap::new(),
        }
    }

    /// Fully qualified name of the component type held by this group.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Iterate the group's components in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentSlot> {
        self.slots.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// An entity that has not been added to a world yet.
#[derive(Debug, Default)]
pub struct EntityBlueprint {
    pub transform: Transform,
    pub components: Vec<Box<dyn Component>>,
}

impl EntityBlueprint {
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            components: Vec::new(),
        }
    }

    /// Attach a component.
    #[must_use]
    pub fn with(mut self, component: impl Component) -> Self {
        self.components.push(Box::new(component));
        self
    }
}

/// The ECS world: entity storage and component groups.
#[derive(Debug, Default)]
pub struct World {
    entity_ids: IdAllocator<Entity>,
    component_ids: IdAllocator<ComponentId>,
    entities: BTreeMap<Entity, EntityData>,
    groups: Vec<ComponentGroup>,
    group_index: HashMap<TypeId, usize>,
    /// Which group each live component is stored in.
    component_group: HashMap<ComponentId, usize>,
}

impl World {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Spawn a new entity with the given transform and components.
    pub fn spawn(&mut self, transform: Transform, components: Vec<Box<dyn Component>>) -> Entity {
        let entity = self.entity_ids.allocate();
        self.entities.insert(
            entity,
            EntityData {
                transform,
                components: Vec::with_capacity(components.len()),
            },
        );
        for component in components {
            self.attach(entity, component);
        }
        entity
    }

    /// Spawn a previously assembled entity.
    pub fn spawn_blueprint(&mut self, blueprint: EntityBlueprint) -> Entity {
        self.spawn(blueprint.transform, blueprint.components)
    }

    /// Add a batch of entities, returning their new identities in order.
    pub fn insert_entities(&mut self, blueprints: Vec<EntityBlueprint>) -> Vec<Entity> {
        let entities: Vec<Entity> = blueprints
            .into_iter()
            .map(|b| self.spawn_blueprint(b))
            .collect();
        tracing::debug!(count = entities.len(), "entities inserted");
        entities
    }

    /// Despawn an entity, removing all its components.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), WorldError> {
        let data = self
            .entities
            .remove(&entity)
            .ok_or(WorldError::EntityNotFound(entity))?;
        for id in data.components {
            self.detach(id);
        }
        Ok(())
    }

    /// Return the count of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Return the count of live components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.component_group.len()
    }

    /// Returns `true` if the world holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = (Entity, &EntityData)> {
        self.entities.iter().map(|(e, d)| (*e, d))
    }

    #[must_use]
    pub fn entity(&self, entity: Entity) -> Option<&EntityData> {
        self.entities.get(&entity)
    }

    // -- Component operations --

    /// Look up a component by identity.
    #[must_use]
    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.slot(id).map(|s| s.component.as_ref())
    }

    /// The first component of type `T` attached to `entity`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components_of(entity)
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// All components attached to `entity`, in attachment order.
    pub fn components_of(&self, entity: Entity) -> impl Iterator<Item = &dyn Component> {
        self.entities
            .get(&entity)
            .into_iter()
            .flat_map(|d| d.components.iter())
            .filter_map(|id| self.component(*id))
    }

    /// Component groups in the order their type was first inserted.
    ///
    /// Groups whose components have all been removed are skipped.
    pub fn component_groups(&self) -> impl Iterator<Item = &ComponentGroup> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    // -- Internals --

    fn attach(&mut self, owner: Entity, component: Box<dyn Component>) -> ComponentId {
        let id = self.component_ids.allocate();
        let type_id = component.as_any().type_id();
        let group_idx = match self.group_index.get(&type_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.groups.len();
                self.groups.push(ComponentGroup::new(component.type_name()));
                self.group_index.insert(type_id, idx);
                idx
            }
        };
        self.groups[group_idx].slots.insert(
            id,
            ComponentSlot {
                id,
                owner,
                component,
            },
        );
        self.component_group.insert(id, group_idx);
        if let Some(data) = self.entities.get_mut(&owner) {
            data.components.push(id);
        }
        id
    }

    fn detach(&mut self, id: ComponentId) -> Option<ComponentSlot> {
        let group_idx = self.component_group.remove(&id)?;
        self.groups[group_idx].slots.remove(&id)
    }

    fn slot(&self, id: ComponentId) -> Option<&ComponentSlot> {
        let group_idx = *self.component_group.get(&id)?;
        self.groups[group_idx].slots.get(&id)
    }
}
