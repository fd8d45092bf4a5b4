//! Tests for the reservation mechanisms
//!
//! Everything runs against the simulated desktop or the unsupported stub,
//! so these pass on any host.

use crate::core::error::ReservationError;
use crate::core::types::{DockSide, Mechanism, WindowHandle, WorkArea};
use crate::os::simulated::SimulatedDesktop;
use crate::os::stub::{UnsupportedAppBar, UnsupportedWorkarea};
use crate::os::ApplyOptions;
use crate::reservation::{
    AppBarReservation, ReservationPhase, SpaceReserver, WorkareaReservation,
};

const SCREEN: WorkArea = WorkArea::new(0, 0, 1920, 1040);

fn workarea_manager() -> (SimulatedDesktop, WorkareaReservation<SimulatedDesktop>) {
    let desktop = SimulatedDesktop::new(SCREEN);
    let mut manager = WorkareaReservation::new(desktop.clone(), ApplyOptions::default());
    manager.initialize().unwrap();
    (desktop, manager)
}

mod workarea {
    use super::*;

    #[test]
    fn test_status_before_initialize() {
        let manager =
            WorkareaReservation::new(SimulatedDesktop::new(SCREEN), ApplyOptions::default());
        let status = manager.status();

        assert_eq!(status.phase, ReservationPhase::Uninitialized);
        assert_eq!(status.mechanism, Mechanism::Workarea);
        assert!(!status.is_reserved());
        assert_eq!(status.state.reserved_width_px, 0);
        assert_eq!(status.state.reserved_side, None);
        assert_eq!(status.original, None);
    }

    #[test]
    fn test_reserve_before_initialize_fails() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut manager = WorkareaReservation::new(desktop.clone(), ApplyOptions::default());

        assert_eq!(manager.reserve_right(450), Err(ReservationError::NotInitialized));
        assert_eq!(manager.restore(), Err(ReservationError::NotInitialized));
        assert!(desktop.applied().is_empty());
    }

    #[test]
    fn test_end_to_end_right_reservation() {
        let (desktop, mut manager) = workarea_manager();

        manager.reserve_right(450).unwrap();
        assert_eq!(desktop.work_area(), WorkArea::new(0, 0, 1470, 1040));

        let status = manager.status();
        assert_eq!(status.phase, ReservationPhase::Ready);
        assert!(status.is_reserved());
        assert_eq!(status.state.reserved_width_px, 450);
        assert_eq!(status.state.reserved_side, Some(DockSide::Right));

        manager.restore().unwrap();
        assert_eq!(desktop.work_area(), SCREEN);
        assert!(!manager.status().is_reserved());
        assert_eq!(manager.status().state.reserved_side, None);
    }

    #[test]
    fn test_restore_twice_is_noop() {
        let (desktop, mut manager) = workarea_manager();

        manager.reserve_left(300).unwrap();
        manager.restore().unwrap();
        let writes = desktop.applied().len();

        manager.restore().unwrap();
        assert_eq!(desktop.applied().len(), writes);
        assert_eq!(desktop.work_area(), SCREEN);
    }

    #[test]
    fn test_reservations_do_not_stack() {
        let (desktop, mut manager) = workarea_manager();

        manager.reserve_left(100).unwrap();
        manager.reserve_left(200).unwrap();

        assert_eq!(desktop.work_area().left, 200);
        assert_eq!(manager.status().state.reserved_width_px, 200);
    }

    #[test]
    fn test_side_switch_restores_other_edge() {
        let (desktop, mut manager) = workarea_manager();

        manager.reserve_left(100).unwrap();
        manager.reserve_right(150).unwrap();

        let area = desktop.work_area();
        assert_eq!(area.left, SCREEN.left);
        assert_eq!(area.right, SCREEN.right - 150);
        assert_eq!(manager.status().state.reserved_side, Some(DockSide::Right));
    }

    #[test]
    fn test_reinitialize_keeps_original_baseline() {
        let (desktop, mut manager) = workarea_manager();

        manager.reserve_right(450).unwrap();
        let baseline = manager.initialize().unwrap();

        assert_eq!(baseline, SCREEN);
        assert_ne!(desktop.work_area(), baseline);
    }

    #[test]
    fn test_invalid_width_is_rejected_without_os_call() {
        let (desktop, mut manager) = workarea_manager();

        for width in [0, 1920, 5000, u32::MAX] {
            assert!(matches!(
                manager.reserve_left(width),
                Err(ReservationError::ApplyFailed { .. })
            ));
        }

        assert!(desktop.applied().is_empty());
        assert!(!manager.status().is_reserved());
    }

    #[test]
    fn test_invalid_width_releases_active_reservation() {
        let (desktop, mut manager) = workarea_manager();
        manager.reserve_right(450).unwrap();

        assert!(matches!(
            manager.reserve_left(5000),
            Err(ReservationError::ApplyFailed { .. })
        ));

        let status = manager.status();
        assert!(!status.is_reserved());
        assert_eq!(status.state.reserved_width_px, 0);
        assert_eq!(status.state.reserved_side, None);
        assert_eq!(desktop.work_area(), SCREEN);
    }

    #[test]
    fn test_apply_failure_leaves_unreserved() {
        let (desktop, mut manager) = workarea_manager();
        desktop.set_fail_apply(true);

        assert!(matches!(
            manager.reserve_right(450),
            Err(ReservationError::ApplyFailed { .. })
        ));
        assert!(!manager.status().is_reserved());
        assert_eq!(desktop.work_area(), SCREEN);
    }

    #[test]
    fn test_restore_failure_keeps_reserved() {
        let (desktop, mut manager) = workarea_manager();
        manager.reserve_right(450).unwrap();

        desktop.set_fail_apply(true);
        assert!(manager.restore().is_err());
        assert!(manager.status().is_reserved());

        desktop.set_fail_apply(false);
        manager.restore().unwrap();
        assert_eq!(desktop.work_area(), SCREEN);
    }

    #[test]
    fn test_failed_pre_restore_keeps_old_reservation() {
        let (desktop, mut manager) = workarea_manager();
        manager.reserve_left(100).unwrap();

        desktop.set_fail_apply(true);
        assert!(manager.reserve_right(200).is_err());

        let status = manager.status();
        assert!(status.is_reserved());
        assert_eq!(status.state.reserved_side, Some(DockSide::Left));
        assert_eq!(status.state.reserved_width_px, 100);
    }

    #[test]
    fn test_query_failure_marks_unavailable() {
        let desktop = SimulatedDesktop::new(SCREEN);
        desktop.set_fail_query(true);
        let mut manager = WorkareaReservation::new(desktop.clone(), ApplyOptions::default());

        assert!(matches!(
            manager.initialize(),
            Err(ReservationError::QueryFailed { .. })
        ));
        assert_eq!(manager.status().phase, ReservationPhase::Unavailable);
        assert_eq!(manager.reserve_right(450), Err(ReservationError::NotInitialized));

        desktop.set_fail_query(false);
        assert_eq!(manager.initialize().unwrap(), SCREEN);
        assert_eq!(manager.status().phase, ReservationPhase::Ready);
    }

    #[test]
    fn test_apply_options_are_forwarded() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let options = ApplyOptions {
            persist: false,
            broadcast: true,
        };
        let mut manager = WorkareaReservation::new(desktop.clone(), options);
        manager.initialize().unwrap();

        manager.reserve_right(450).unwrap();
        manager.restore().unwrap();

        assert_eq!(desktop.broadcast_count(), 2);
        assert_eq!(desktop.persisted(), None);
    }

    #[test]
    fn test_recover_puts_back_leaked_reservation() {
        // An earlier run shrank the desktop and exited without restoring
        let desktop = SimulatedDesktop::new(WorkArea::new(0, 0, 1470, 1040));
        let mut manager = WorkareaReservation::new(desktop.clone(), ApplyOptions::default());

        assert_eq!(manager.recover(SCREEN), Ok(true));
        assert_eq!(desktop.work_area(), SCREEN);

        let status = manager.status();
        assert_eq!(status.phase, ReservationPhase::Ready);
        assert_eq!(status.original, Some(SCREEN));
        assert!(!status.is_reserved());

        // Later reservations restore to the recovered baseline
        manager.reserve_left(300).unwrap();
        manager.restore().unwrap();
        assert_eq!(desktop.work_area(), SCREEN);

        let writes = desktop.applied().len();
        assert_eq!(manager.recover(SCREEN), Ok(false));
        assert_eq!(desktop.applied().len(), writes);
    }

    #[test]
    fn test_recover_releases_own_reservation_first() {
        let (desktop, mut manager) = workarea_manager();
        manager.reserve_right(450).unwrap();

        assert_eq!(manager.recover(SCREEN), Ok(false));
        assert!(!manager.status().is_reserved());
        assert_eq!(desktop.work_area(), SCREEN);
    }

    #[test]
    fn test_recover_rejects_degenerate_baseline() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut manager = WorkareaReservation::new(desktop.clone(), ApplyOptions::default());

        assert!(matches!(
            manager.recover(WorkArea::new(500, 0, 400, 1040)),
            Err(ReservationError::ApplyFailed { .. })
        ));
        assert!(desktop.applied().is_empty());
    }

    #[test]
    fn test_unsupported_platform_guard() {
        let mut manager = WorkareaReservation::new(UnsupportedWorkarea::new(), ApplyOptions::default());

        assert!(matches!(
            manager.initialize(),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert_eq!(manager.status().phase, ReservationPhase::Unavailable);
        assert!(matches!(
            manager.reserve_left(300),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert!(matches!(
            manager.reserve_right(300),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert!(matches!(
            manager.restore(),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert!(matches!(
            manager.recover(SCREEN),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert!(!manager.status().is_reserved());
        assert_eq!(manager.status().phase, ReservationPhase::Unavailable);
    }
}

mod appbar {
    use super::*;

    const HWND: WindowHandle = WindowHandle(0x2a);

    fn appbar_manager() -> (SimulatedDesktop, AppBarReservation<SimulatedDesktop>) {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut manager = AppBarReservation::new(desktop.clone(), HWND);
        manager.initialize().unwrap();
        (desktop, manager)
    }

    #[test]
    fn test_register_and_remove() {
        let (desktop, mut manager) = appbar_manager();

        manager.reserve(DockSide::Right, 450).unwrap();
        assert_eq!(desktop.registered_appbars(), vec![HWND]);
        assert_eq!(desktop.work_area(), WorkArea::new(0, 0, 1470, 1040));
        assert_eq!(manager.committed(), Some(WorkArea::new(1470, 0, 1920, 1040)));
        assert!(manager.status().is_reserved());

        manager.restore().unwrap();
        assert!(desktop.registered_appbars().is_empty());
        assert_eq!(desktop.work_area(), SCREEN);
        assert_eq!(manager.committed(), None);

        // Removing twice is harmless
        manager.restore().unwrap();
    }

    #[test]
    fn test_resize_reregisters() {
        let (desktop, mut manager) = appbar_manager();

        manager.reserve(DockSide::Right, 450).unwrap();
        manager.reserve(DockSide::Right, 600).unwrap();

        assert_eq!(desktop.registered_appbars(), vec![HWND]);
        assert_eq!(desktop.work_area(), WorkArea::new(0, 0, 1320, 1040));
        assert_eq!(manager.status().state.reserved_width_px, 600);
    }

    #[test]
    fn test_left_dock() {
        let (desktop, mut manager) = appbar_manager();

        manager.reserve(DockSide::Left, 300).unwrap();
        assert_eq!(desktop.work_area(), WorkArea::new(300, 0, 1920, 1040));
    }

    #[test]
    fn test_width_is_pinned_next_to_other_bars() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut other = AppBarReservation::new(desktop.clone(), WindowHandle(0x99));
        other.initialize().unwrap();
        other.reserve(DockSide::Right, 200).unwrap();

        let mut manager = AppBarReservation::new(desktop.clone(), HWND);
        manager.initialize().unwrap();
        manager.reserve(DockSide::Right, 450).unwrap();

        assert_eq!(manager.committed(), Some(WorkArea::new(1270, 0, 1720, 1040)));
        assert_eq!(desktop.work_area(), WorkArea::new(0, 0, 1270, 1040));
    }

    #[test]
    fn test_positioning_failure_unregisters() {
        let (desktop, mut manager) = appbar_manager();
        desktop.set_fail_apply(true);

        assert!(matches!(
            manager.reserve(DockSide::Right, 450),
            Err(ReservationError::ApplyFailed { .. })
        ));
        assert!(desktop.registered_appbars().is_empty());
        assert!(!manager.status().is_reserved());
    }

    #[test]
    fn test_null_handle_is_rejected() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut manager = AppBarReservation::new(desktop.clone(), WindowHandle(0));
        manager.initialize().unwrap();

        assert!(matches!(
            manager.reserve(DockSide::Right, 450),
            Err(ReservationError::InvalidWindowHandle { .. })
        ));
        assert!(!manager.status().is_reserved());
    }

    #[test]
    fn test_invalid_width_unregisters_active_bar() {
        let (desktop, mut manager) = appbar_manager();
        manager.reserve(DockSide::Right, 450).unwrap();

        assert!(matches!(
            manager.reserve(DockSide::Left, 5000),
            Err(ReservationError::ApplyFailed { .. })
        ));
        assert!(desktop.registered_appbars().is_empty());
        assert!(!manager.status().is_reserved());
        assert_eq!(desktop.work_area(), SCREEN);
    }

    #[test]
    fn test_recover_drops_stale_registration() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut stale = AppBarReservation::new(desktop.clone(), HWND);
        stale.initialize().unwrap();
        stale.reserve(DockSide::Right, 450).unwrap();
        // The earlier owner goes away without removing its bar
        drop(stale);
        assert_eq!(desktop.registered_appbars(), vec![HWND]);

        let mut manager = AppBarReservation::new(desktop.clone(), HWND);
        assert_eq!(manager.recover(SCREEN), Ok(false));
        assert!(desktop.registered_appbars().is_empty());
        assert_eq!(desktop.work_area(), SCREEN);
        assert_eq!(manager.status().phase, ReservationPhase::Ready);

        manager.reserve(DockSide::Right, 450).unwrap();
        assert_eq!(desktop.work_area(), WorkArea::new(0, 0, 1470, 1040));
    }

    #[test]
    fn test_unsupported_platform_guard() {
        let mut manager = AppBarReservation::new(UnsupportedAppBar::new(), HWND);

        assert!(matches!(
            manager.initialize(),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert_eq!(manager.status().phase, ReservationPhase::Unavailable);
        assert!(matches!(
            manager.reserve(DockSide::Right, 450),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert!(matches!(
            manager.restore(),
            Err(ReservationError::PlatformUnsupported { .. })
        ));
        assert_eq!(manager.status().mechanism, Mechanism::AppBar);
    }
}

mod seam {
    use super::*;
    use crate::config::ReservationConfig;
    use crate::reservation::platform_reserver;

    #[test]
    fn test_trait_objects_share_contract() {
        let desktop = SimulatedDesktop::new(SCREEN);
        let mut reservers: Vec<Box<dyn SpaceReserver>> = vec![
            Box::new(WorkareaReservation::new(desktop.clone(), ApplyOptions::default())),
            Box::new(AppBarReservation::new(desktop.clone(), WindowHandle(1))),
        ];

        for reserver in reservers.iter_mut() {
            reserver.initialize().unwrap();
            reserver.reserve(DockSide::Right, 450).unwrap();
            assert_eq!(desktop.work_area(), WorkArea::new(0, 0, 1470, 1040));
            reserver.restore().unwrap();
            assert_eq!(desktop.work_area(), SCREEN);
        }
    }

    #[test]
    fn test_appbar_requires_window_handle() {
        let config = ReservationConfig {
            mechanism: Mechanism::AppBar,
            ..ReservationConfig::default()
        };

        assert!(matches!(
            platform_reserver(&config, None),
            Err(ReservationError::InvalidWindowHandle { .. })
        ));
        let reserver = platform_reserver(&config, Some(WindowHandle(5))).unwrap();
        assert_eq!(reserver.mechanism(), Mechanism::AppBar);
    }

    #[test]
    fn test_default_config_builds_workarea() {
        let reserver = platform_reserver(&ReservationConfig::default(), None).unwrap();
        assert_eq!(reserver.mechanism(), Mechanism::Workarea);
        assert_eq!(reserver.status().phase, ReservationPhase::Uninitialized);
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn side() -> impl Strategy<Value = DockSide> {
        prop_oneof![Just(DockSide::Left), Just(DockSide::Right)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Reserving then restoring always returns the exact baseline
        #[test]
        fn reserve_then_restore_is_identity(
            left in -3840i32..3840,
            top in -1000i32..1000,
            width in 400i32..4000,
            height in 300i32..2200,
            side in side(),
            reserve in 1u32..400,
        ) {
            let baseline = WorkArea::new(left, top, left + width, top + height);
            let desktop = SimulatedDesktop::new(baseline);
            let mut manager = WorkareaReservation::new(desktop.clone(), ApplyOptions::default());
            manager.initialize().unwrap();

            manager.reserve(side, reserve).unwrap();
            prop_assert_eq!(desktop.work_area().width(), i64::from(width) - i64::from(reserve));

            manager.restore().unwrap();
            prop_assert_eq!(desktop.work_area(), baseline);
            prop_assert!(!manager.status().is_reserved());
        }

        /// Any sequence of reservations leaves only the last one applied
        #[test]
        fn last_reservation_wins(
            requests in prop::collection::vec((side(), 1u32..900), 1..8),
        ) {
            let (desktop, mut manager) = workarea_manager();

            for (side, width) in &requests {
                manager.reserve(*side, *width).unwrap();
            }

            let (side, width) = requests[requests.len() - 1];
            prop_assert_eq!(desktop.work_area(), SCREEN.with_reserved(side, width).unwrap());
            prop_assert_eq!(manager.status().state.reserved_side, Some(side));
        }
    }
}
