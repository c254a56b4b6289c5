//! Application Context
//!
//! Shared configuration provided via Leptos Context API, plus constructors
//! for the services pages build on it.

use std::rc::Rc;

use bingo_core::{AdminController, BingoConfig, DevicePrefs, FeatureFlags, PostgrestRepository};
use leptos::prelude::*;

use crate::storage::LocalStorageKv;

pub type RemoteRepo = Rc<PostgrestRepository>;
pub type Admin = AdminController<RemoteRepo>;

#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<BingoConfig>,
}

impl AppContext {
    pub fn new(config: BingoConfig) -> Self {
        Self {
            config: StoredValue::new(config),
        }
    }

    pub fn config(&self) -> BingoConfig {
        self.config.get_value()
    }

    pub fn features(&self) -> FeatureFlags {
        self.config.with_value(|c| c.features.clone())
    }

    pub fn repository(&self) -> RemoteRepo {
        self.config.with_value(|c| Rc::new(PostgrestRepository::new(c)))
    }

    /// This device's card and rules flag
    pub fn prefs(&self) -> DevicePrefs<LocalStorageKv> {
        self.config.with_value(|c| DevicePrefs::new(LocalStorageKv, c))
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
