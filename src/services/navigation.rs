use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
    /// Add-vehicle step, returning to the booking form with this service.
    AddVehicle { service_id: i64 },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AddVehicle { service_id } => format!("/add-vehicle?service_id={service_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);

    fn navigate_after(&self, route: Route, delay: Duration);
}

/// Delivers routes to whoever owns the receiving end.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigating");
        if self.tx.send(route).is_err() {
            tracing::warn!("navigation receiver dropped");
        }
    }

    /// Must be called from within a tokio runtime.
    fn navigate_after(&self, route: Route, delay: Duration) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%route, "navigating after delay");
            let _ = tx.send(route);
        });
    }
}
