//! Single-shot geolocation via the GeoClue2 D-Bus service.
//!
//! Failures here are deliberately opaque to the caller: locate is a
//! best-effort convenience, the user is never interrupted over it.

use anyhow::{Context, Result};
use futures::StreamExt;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

use crate::geo::Coordinate;

/// GCLUE_ACCURACY_LEVEL_EXACT
const ACCURACY_EXACT: u32 = 8;

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Manager",
    default_service = "org.freedesktop.GeoClue2",
    default_path = "/org/freedesktop/GeoClue2/Manager"
)]
trait Manager {
    fn get_client(&self) -> zbus::Result<OwnedObjectPath>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Client",
    default_service = "org.freedesktop.GeoClue2"
)]
trait Client {
    fn start(&self) -> zbus::Result<()>;

    fn stop(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_desktop_id(&self, id: &str) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_requested_accuracy_level(&self, level: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn location_updated(&self, old: ObjectPath<'_>, new: ObjectPath<'_>) -> zbus::Result<()>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Location",
    default_service = "org.freedesktop.GeoClue2"
)]
trait Location {
    #[zbus(property)]
    fn latitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn longitude(&self) -> zbus::Result<f64>;
}

/// Resolve the current position once.
///
/// Waits for the first location update after starting a client; no timeout
/// is imposed here, whatever limits the platform service applies apply.
pub async fn current_position() -> Result<Coordinate> {
    let connection = zbus::Connection::system()
        .await
        .context("connecting to the system bus")?;

    let manager = ManagerProxy::new(&connection).await?;
    let client_path = manager
        .get_client()
        .await
        .context("creating a GeoClue client")?;

    let client = ClientProxy::builder(&connection)
        .path(client_path)?
        .build()
        .await?;
    client.set_desktop_id(crate::app::APP_ID).await?;
    client.set_requested_accuracy_level(ACCURACY_EXACT).await?;

    let mut updates = client.receive_location_updated().await?;
    client.start().await.context("starting the GeoClue client")?;

    let signal = updates
        .next()
        .await
        .context("GeoClue closed the stream without a location")?;
    let args = signal.args()?;

    let location = LocationProxy::builder(&connection)
        .path(args.new().clone().into_owned())?
        .build()
        .await?;
    let coordinate = Coordinate::new(location.latitude().await?, location.longitude().await?);

    if let Err(err) = client.stop().await {
        log::debug!("failed to stop GeoClue client: {err}");
    }

    Ok(coordinate)
}
