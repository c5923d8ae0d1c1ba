//! Target surface resolution
//!
//! A request for the touch panel can only be honoured while an in-room
//! navigator is attached. The inventory is queried for every request and
//! never cached, since panels can come and go between an open and its close.

use log::{debug, info, warn};
use std::rc::Rc;
use userguide_core::{Host, Peripheral, Surface, SyncError, NAVIGATOR_NAME_SUFFIX};
use userguide_types::PeripheralLocation;

/// True for a secondary touch panel located inside the room
pub fn is_in_room_navigator(peripheral: &Peripheral) -> bool {
    peripheral.name.ends_with(NAVIGATOR_NAME_SUFFIX)
        && peripheral.location == PeripheralLocation::InsideRoom
}

pub struct TargetResolver<H: Host> {
    host: Rc<H>,
}

impl<H: Host> TargetResolver<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self { host }
    }

    /// Surface a request for `requested` should actually use
    pub async fn resolve(&self, requested: Surface) -> Surface {
        if requested == Surface::Osd {
            return Surface::Osd;
        }

        let peripherals = match self.host.query_peripherals().await {
            Ok(peripherals) => peripherals,
            Err(e) => {
                warn!("{}; using OSD", SyncError::PeripheralQueryFailure(e));
                return Surface::Osd;
            }
        };

        if peripherals.iter().any(is_in_room_navigator) {
            debug!("In-room navigator present, keeping {}", requested);
            requested
        } else {
            info!("No in-room navigators, changing target {} to OSD", requested);
            Surface::Osd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Failures, SimulatedHost};

    fn resolver() -> (Rc<SimulatedHost>, TargetResolver<SimulatedHost>) {
        let host = Rc::new(SimulatedHost::offline());
        (Rc::clone(&host), TargetResolver::new(host))
    }

    #[test]
    fn test_navigator_classification() {
        assert!(is_in_room_navigator(&Peripheral::new(
            "Cisco Room Navigator",
            PeripheralLocation::InsideRoom
        )));
        assert!(!is_in_room_navigator(&Peripheral::new(
            "Cisco Room Navigator",
            PeripheralLocation::OutsideRoom
        )));
        assert!(!is_in_room_navigator(&Peripheral::new(
            "Cisco Touch 10",
            PeripheralLocation::InsideRoom
        )));
    }

    #[tokio::test]
    async fn test_osd_is_unconditional() {
        let (host, resolver) = resolver();
        host.set_failures(Failures {
            peripherals: true,
            ..Default::default()
        });
        assert_eq!(resolver.resolve(Surface::Osd).await, Surface::Osd);
    }

    #[tokio::test]
    async fn test_controller_falls_back_to_osd() {
        let (host, resolver) = resolver();
        assert_eq!(resolver.resolve(Surface::Controller).await, Surface::Osd);

        host.set_peripherals(vec![Peripheral::new(
            "Cisco Room Navigator",
            PeripheralLocation::OutsideRoom,
        )]);
        assert_eq!(resolver.resolve(Surface::Controller).await, Surface::Osd);

        host.attach_navigator();
        assert_eq!(resolver.resolve(Surface::Controller).await, Surface::Controller);

        host.set_failures(Failures {
            peripherals: true,
            ..Default::default()
        });
        assert_eq!(resolver.resolve(Surface::Controller).await, Surface::Osd);
    }

    #[tokio::test]
    async fn test_inventory_is_not_cached() {
        let (host, resolver) = resolver();
        host.attach_navigator();
        assert_eq!(resolver.resolve(Surface::Controller).await, Surface::Controller);

        host.detach_navigators();
        assert_eq!(resolver.resolve(Surface::Controller).await, Surface::Osd);
    }
}
