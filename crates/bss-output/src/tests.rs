//! Tests for bss-output.

#[cfg(test)]
mod row_tests {
    use bss_core::Tick;
    use bss_sim::{Event, EventCounts, EventKind};

    use crate::{EventRow, TimeSeriesRow};

    #[test]
    fn series_rows_are_indexed_by_minute() {
        let series = vec![
            EventCounts::default(),
            EventCounts { finished_journeys: 2, failed_starts: 1, failed_ends: 0 },
        ];
        let rows = TimeSeriesRow::tag_series("base", 3, &series);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time, 1);
        assert_eq!(rows[1].sim_num, 3);
        assert_eq!(rows[1].scenario_id, "base");
        assert_eq!(rows[1].counts(), series[1]);
    }

    #[test]
    fn event_rows_keep_order() {
        let events = [
            Event { tick: Tick(4), kind: EventKind::FailedStart },
            Event { tick: Tick(9), kind: EventKind::FinishedJourney },
        ];
        let rows = EventRow::tag_events("wh", 0, &events);
        assert_eq!(rows.iter().map(|r| r.time).collect::<Vec<_>>(), [4, 9]);
        assert_eq!(rows[1].event, EventKind::FinishedJourney);
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use bss_sim::{EventCounts, EventKind};

    use crate::csv::{CsvWriter, EVENTS_FILE, TIME_SERIES_FILE};
    use crate::writer::TableWriter;
    use crate::{EventRow, TimeSeriesRow};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created_under_scenario_dir() {
        let dir = tmp();
        let w = CsvWriter::for_scenario(dir.path(), "base_5am").unwrap();
        assert_eq!(w.dir(), dir.path().join("base_5am").as_path());
        assert!(dir.path().join("base_5am").join(TIME_SERIES_FILE).exists());
        assert!(dir.path().join("base_5am").join(EVENTS_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(
            headers(&dir.path().join(TIME_SERIES_FILE)),
            ["scenario_id", "sim_num", "time", "finished_journeys", "failed_starts", "failed_ends"]
        );
        assert_eq!(headers(&dir.path().join(EVENTS_FILE)), ["scenario_id", "sim_num", "time", "event"]);
    }

    #[test]
    fn csv_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let counts = EventCounts { finished_journeys: 5, failed_starts: 0, failed_ends: 1 };
        w.write_time_series(&[TimeSeriesRow::new("s", 1, 42, &counts)]).unwrap();
        w.write_events(&[EventRow { scenario_id: "s".into(), sim_num: 1, time: 42, event: EventKind::FailedEnd }])
            .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(TIME_SERIES_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["s", "1", "42", "5", "0", "1"]);

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][3], "failed_ends");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("absent")).is_err());
    }
}
