//! Navigation Shell
//!
//! Top bar state for a page: whether to show it, the signed-in user's
//! badge, and the menu with the active entry marked.

use std::sync::Arc;

use kernel::principal::Viewer;

use crate::application::config::AcademyConfig;
use crate::domain::navigation::{MenuItem, build_menu, is_hidden_path, user_initial};

#[derive(Debug, Clone, PartialEq)]
pub struct NavUser {
    pub username: String,
    pub initial: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavShell {
    pub visible: bool,
    /// Back link on every page but home
    pub show_back: bool,
    pub user: Option<NavUser>,
    pub menu: Vec<MenuItem>,
}

pub struct NavigationUseCase {
    config: Arc<AcademyConfig>,
}

impl NavigationUseCase {
    pub fn new(config: Arc<AcademyConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, viewer: &Viewer, path: &str, host: Option<&str>) -> NavShell {
        let path = if path.is_empty() { "/" } else { path };
        let user = viewer.principal().map(|p| NavUser {
            username: p.username.clone(),
            initial: user_initial(&p.username),
        });

        NavShell {
            visible: user.is_some() && !is_hidden_path(path),
            show_back: path != "/",
            user,
            menu: build_menu(path, host, &self.config.domain_configs),
        }
    }
}
