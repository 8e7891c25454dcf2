/*
 * Unit tests for the console panel
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - test_parse_commands
 * - test_parse_errors
 * - test_validate_rejects_missing_floor
 * - test_panel_forwards_valid_lines
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod console_tests {
    use crate::panel::{ConsolePanel, PanelError, PanelEvent};
    use crate::shared::Call::{Cab, HallDown, HallUp};
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!("up 1".parse::<PanelEvent>(), Ok(PanelEvent::Call { floor: 1, call: HallUp }));
        assert_eq!("DOWN 4".parse::<PanelEvent>(), Ok(PanelEvent::Call { floor: 4, call: HallDown }));
        assert_eq!("  cab   0 ".parse::<PanelEvent>(), Ok(PanelEvent::Call { floor: 0, call: Cab }));
        assert_eq!("reset".parse::<PanelEvent>(), Ok(PanelEvent::Reset));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "jump 2".parse::<PanelEvent>(),
            Err(PanelError::UnknownCommand("jump".into()))
        );
        assert_eq!(
            "cab".parse::<PanelEvent>(),
            Err(PanelError::MissingFloor("cab".into()))
        );
        assert_eq!(
            "up two".parse::<PanelEvent>(),
            Err(PanelError::InvalidFloor("two".into()))
        );
        assert_eq!(
            "up -1".parse::<PanelEvent>(),
            Err(PanelError::InvalidFloor("-1".into()))
        );
        assert_eq!(
            "reset now".parse::<PanelEvent>(),
            Err(PanelError::TrailingInput("now".into()))
        );
    }

    #[test]
    fn test_validate_rejects_missing_floor() {
        let event = PanelEvent::Call { floor: 5, call: Cab };

        assert_eq!(
            event.validate(5),
            Err(PanelError::FloorOutOfRange { floor: 5, n_floors: 5 })
        );
        assert_eq!(
            PanelEvent::Call { floor: 4, call: Cab }.validate(5),
            Ok(PanelEvent::Call { floor: 4, call: Cab })
        );
        assert_eq!(PanelEvent::Reset.validate(5), Ok(PanelEvent::Reset));
    }

    #[test]
    fn test_panel_forwards_valid_lines() {
        // Arrange
        let input = "up 1\n# comment\n\ncab 9\nbogus\ndown 3\nreset\n";
        let (panel_tx, panel_rx) = unbounded::<PanelEvent>();
        let panel = ConsolePanel::new(Cursor::new(input), 5, panel_tx);

        // Act
        panel.run();
        let events: Vec<PanelEvent> = panel_rx.iter().collect();

        // Assert
        assert_eq!(
            events,
            vec![
                PanelEvent::Call { floor: 1, call: HallUp },
                PanelEvent::Call { floor: 3, call: HallDown },
                PanelEvent::Reset,
            ]
        );
    }
}
