/*
 * Unit tests for the scenario runner
 *
 * Tests:
 * - test_parse_scenario
 * - test_run_scenario_serves_calls
 * - test_scripted_reset_keeps_calls
 * - test_out_of_range_floor_is_rejected
 * - test_missing_floor_is_rejected
 * - test_format_record
 * - test_sample_scenarios
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod script_tests {
    use crate::config::ElevatorConfig;
    use crate::scenario::{
        format_record, load_scenario, parse_scenario, run_scenario, EventKind, ScenarioError,
    };
    use std::path::PathBuf;
    use crate::shared::Call::{Cab, HallUp};
    use crate::shared::Direction::{Down, Stop, Up};

    const TIE_SCENARIO: &str = r#"
        ticks = 60

        [[event]]
        tick = 1
        kind = "cab"
        floor = 2

        [[event]]
        tick = 12
        kind = "bits"
        hall_up = 0b10000
        cab = 0b00001
    "#;

    #[test]
    fn test_parse_scenario() {
        let scenario = parse_scenario(TIE_SCENARIO).unwrap();

        assert_eq!(scenario.ticks, 60);
        assert_eq!(scenario.events.len(), 2);
        assert_eq!(scenario.events[0].kind, EventKind::Cab);
        assert_eq!(scenario.events[0].floor, Some(2));
        assert_eq!(scenario.events[1].hall_up, 0b10000);
        assert_eq!(scenario.events[1].hall_down, 0);
    }

    #[test]
    fn test_run_scenario_serves_calls() {
        // Arrange
        let scenario = parse_scenario(TIE_SCENARIO).unwrap();

        // Act
        let trace = run_scenario(&scenario, &ElevatorConfig::default()).unwrap();

        // Assert
        assert_eq!(trace.len(), 60);

        // Parked at floor 2 after tick 10, both calls land at tick 12.
        assert_eq!(trace[10].state.floor, 2);
        assert_eq!(trace[10].state.direction, Stop);
        assert_eq!(trace[11].state.direction, Down);
        assert_eq!(trace[11].state.destination, 0);

        let served: Vec<_> = trace.iter().flat_map(|record| record.served.clone()).collect();
        assert_eq!(served, vec![(2, Cab), (0, Cab), (4, HallUp)]);

        let reversal = trace.iter().find(|record| record.served == vec![(0, Cab)]).unwrap();
        assert_eq!(reversal.state.direction, Up);

        let last = trace.last().unwrap();
        assert_eq!(last.state.floor, 4);
        assert_eq!(last.state.direction, Stop);
    }

    #[test]
    fn test_scripted_reset_keeps_calls() {
        // Arrange
        let scenario = parse_scenario(
            r#"
            ticks = 4

            [[event]]
            tick = 1
            kind = "cab"
            floor = 3

            [[event]]
            tick = 3
            kind = "reset"
            "#,
        )
        .unwrap();

        // Act
        let trace = run_scenario(&scenario, &ElevatorConfig::default()).unwrap();

        // Assert
        assert_eq!(trace[1].state.direction, Up);
        assert_eq!(trace[2].state.direction, Stop);
        assert_eq!(trace[2].state.floor, 0);
        assert_eq!(trace[2].state.destination, 0);
        // The cab call survived the reset and is picked up again.
        assert_eq!(trace[3].state.direction, Up);
        assert_eq!(trace[3].state.destination, 3);
    }

    #[test]
    fn test_out_of_range_floor_is_rejected() {
        let scenario = parse_scenario(
            r#"
            ticks = 2

            [[event]]
            tick = 2
            kind = "bits"
            cab = 0b100000
            "#,
        )
        .unwrap();

        match run_scenario(&scenario, &ElevatorConfig::default()) {
            Err(ScenarioError::FloorOutOfRange { tick: 2, floor: 5 }) => {}
            other => panic!("expected out of range floor, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_floor_is_rejected() {
        let scenario = parse_scenario(
            r#"
            ticks = 1

            [[event]]
            tick = 1
            kind = "hall_down"
            "#,
        )
        .unwrap();

        assert!(matches!(
            run_scenario(&scenario, &ElevatorConfig::default()),
            Err(ScenarioError::MissingFloor { tick: 1, .. })
        ));
    }

    #[test]
    fn test_format_record() {
        let scenario = parse_scenario(TIE_SCENARIO).unwrap();
        let trace = run_scenario(&scenario, &ElevatorConfig::default()).unwrap();

        let line = format_record(&trace[0]);

        assert!(line.starts_with("tick    1  floor 0  next 2  dir up (10)"));
    }

    #[test]
    fn test_sample_scenarios() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        let config = ElevatorConfig::default();

        let single = load_scenario(dir.join("single_hall_call.toml")).unwrap();
        let trace = run_scenario(&single, &config).unwrap();
        assert_eq!(trace[14].served, vec![(3, HallUp)]);
        assert_eq!(trace.last().unwrap().state.floor, 3);

        let stall = load_scenario(dir.join("stale_stall.toml")).unwrap();
        let trace = run_scenario(&stall, &config).unwrap();
        assert!(trace[5].state.stalled);
        assert!(trace.last().unwrap().state.stalled);
        assert_eq!(trace.last().unwrap().state.floor, 0);

        assert!(load_scenario(dir.join("tie_break.toml")).is_ok());
    }
}
