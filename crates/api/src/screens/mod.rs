//! Generic list/create/update screens over the master-data entities.
//!
//! Each entity supplies a strategy type implementing [`MasterEntity`]: its
//! metadata, the typed column accessors usable in list screens, its form and
//! its repository calls. The handlers in [`crate::handlers::screens`] are
//! generic over that trait.
//!
//! List columns are declared by name in [`EntityMeta::list_display`] and
//! resolved against the accessors once, when the [`ScreenRegistry`] is
//! built at startup. A name without an accessor fails the build.

pub mod entities;

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use rallycontrol_core::error::CoreError;
use rallycontrol_core::forms::{FieldErrors, FormData};
use rallycontrol_core::labels::title_case;
use rallycontrol_core::types::DbId;
use rallycontrol_db::DbPool;

use crate::forms::FormSpec;

pub use entities::{
    DriverScreen, EventScreen, GateScreen, RaceClassScreen, SessionScreen, StageScreen,
    VehicleScreen,
};

/// Static description of one master-data entity's screens.
#[derive(Debug, Clone, Copy)]
pub struct EntityMeta {
    /// URL segment, e.g. `drivers`.
    pub slug: &'static str,
    /// Entity name used in logs and not-found errors.
    pub model_name: &'static str,
    pub verbose_name: &'static str,
    pub verbose_name_plural: &'static str,
    /// Explicit list title; falls back to the plural name.
    pub list_title: Option<&'static str>,
    pub create_title: &'static str,
    pub update_title: &'static str,
    /// Column names shown in the list, in order.
    pub list_display: &'static [&'static str],
}

impl EntityMeta {
    pub fn list_url(&self) -> String {
        format!("/{}/", self.slug)
    }

    pub fn create_url(&self) -> String {
        format!("/{}/new/", self.slug)
    }

    pub fn edit_url(&self, id: DbId) -> String {
        format!("/{}/{id}/edit/", self.slug)
    }
}

/// A named cell accessor over a record.
pub struct Column<R> {
    pub name: &'static str,
    pub label: Option<&'static str>,
    pub value: fn(&R) -> String,
}

impl<R> Column<R> {
    pub const fn new(name: &'static str, value: fn(&R) -> String) -> Self {
        Self {
            name,
            label: None,
            value,
        }
    }

    pub const fn labelled(self, label: &'static str) -> Self {
        Self {
            label: Some(label),
            ..self
        }
    }

    /// Declared label, else the title-cased column name.
    pub fn label(&self) -> String {
        self.label
            .map(str::to_string)
            .unwrap_or_else(|| title_case(self.name))
    }
}

/// Strategy for one master-data entity.
#[async_trait]
pub trait MasterEntity: Send + Sync + 'static {
    /// What list rows and edit screens operate on; its `Display` is the
    /// text used in flash messages.
    type Record: fmt::Display + Send + Sync;
    /// Validated form output passed to the repository.
    type Input: Send + Sync;

    const META: EntityMeta;

    fn columns() -> &'static [Column<Self::Record>];
    fn form() -> &'static FormSpec;
    fn id(record: &Self::Record) -> DbId;

    fn validate(data: &FormData) -> Result<Self::Input, FieldErrors>;
    /// Form values pre-populating the edit screen.
    fn initial(record: &Self::Record) -> FormData;
    /// Form values of a blank create screen.
    fn defaults() -> FormData;

    /// Every record in the entity's default order.
    async fn list(pool: &DbPool) -> Result<Vec<Self::Record>, sqlx::Error>;
    async fn find(pool: &DbPool, id: DbId) -> Result<Option<Self::Record>, sqlx::Error>;
    async fn insert(pool: &DbPool, input: &Self::Input) -> Result<Self::Record, sqlx::Error>;
    async fn update(
        pool: &DbPool,
        id: DbId,
        input: &Self::Input,
    ) -> Result<Option<Self::Record>, sqlx::Error>;
}

/// A list column resolved to its accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub label: String,
    /// Position in the entity's accessor table.
    pub index: usize,
}

/// A list screen with its columns resolved.
#[derive(Debug, Clone)]
pub struct ListScreen {
    pub slug: &'static str,
    pub title: String,
    pub columns: Vec<ResolvedColumn>,
}

impl ListScreen {
    /// Resolve `display` names against `columns`.
    pub fn resolve<R>(
        meta: &EntityMeta,
        display: &[&str],
        columns: &[Column<R>],
    ) -> Result<Self, CoreError> {
        let resolved = display
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .position(|c| c.name == *name)
                    .map(|index| ResolvedColumn {
                        label: columns[index].label(),
                        index,
                    })
                    .ok_or_else(|| {
                        CoreError::Config(format!(
                            "list screen '{}' declares unknown column '{name}'",
                            meta.slug
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            slug: meta.slug,
            title: crate::nav::page_title(meta.list_title, Some(meta.verbose_name_plural)),
            columns: resolved,
        })
    }

    /// Cell texts of one record, in column order.
    pub fn cells<R>(&self, columns: &[Column<R>], record: &R) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| (columns[c.index].value)(record))
            .collect()
    }
}

/// The resolved list screens of every master-data entity, keyed by slug.
#[derive(Debug)]
pub struct ScreenRegistry {
    screens: HashMap<&'static str, ListScreen>,
}

impl ScreenRegistry {
    pub fn build() -> Result<Self, CoreError> {
        let mut registry = Self {
            screens: HashMap::new(),
        };
        registry.register::<RaceClassScreen>()?;
        registry.register::<DriverScreen>()?;
        registry.register::<EventScreen>()?;
        registry.register::<StageScreen>()?;
        registry.register::<SessionScreen>()?;
        registry.register::<GateScreen>()?;
        registry.register::<VehicleScreen>()?;
        Ok(registry)
    }

    fn register<E: MasterEntity>(&mut self) -> Result<(), CoreError> {
        let screen = ListScreen::resolve(&E::META, E::META.list_display, E::columns())?;
        if self.screens.insert(E::META.slug, screen).is_some() {
            return Err(CoreError::Config(format!(
                "duplicate screen slug '{}'",
                E::META.slug
            )));
        }
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&ListScreen> {
        self.screens.get(slug)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
