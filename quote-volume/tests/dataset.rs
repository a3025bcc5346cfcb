use std::fs;
use std::path::{Path, PathBuf};

use quote_volume::data::DEFAULT_FILE_PREFIX;
use quote_volume::report::render_table;
use quote_volume::{DataLoader, LoaderError, OptionSide, ParseError, QuoteConfig, VolumeSeries};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Quote file for `symbol` on `month`/`day`/2024 with one row per
/// `(call volume, put volume)` pair.
fn quote_file(symbol: &str, month: usize, day: u32, rows: &[(u64, u64)]) -> String {
    let mut text = format!(
        "{symbol} (TEST UNDERLYING),25.10,+0.12,\n{} {:02} 2024 @ 16:15 ET\nCalls,Last Sale,Net,Bid,Ask,Vol,Open Int,Puts,Last Sale,Net,Bid,Ask,Vol,Open Int\n",
        MONTHS[month - 1],
        day
    );
    for (i, (call, put)) in rows.iter().enumerate() {
        text.push_str(&format!(
            "24 Mar {strike}.00 ({symbol}24C{strike}),1.35,0.0,1.30,1.40,{call},300,24 Mar {strike}.00 ({symbol}24P{strike}),0.05,0.0,0.04,0.06,{put},120\n",
            strike = 20 + i,
        ));
    }
    text
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Listing order of the quote files in `dir` that carry `symbol`.
fn listing_order(dir: &Path, symbol: &str) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(DEFAULT_FILE_PREFIX)
        })
        .filter(|p| {
            fs::read_to_string(p)
                .unwrap()
                .starts_with(&format!("{} ", symbol))
        })
        .collect()
}

fn mixed_directory() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "QuoteData_a.dat", &quote_file("AAPL", 3, 8, &[(10, 1), (20, 2)]));
    write(dir.path(), "QuoteData_b.dat", &quote_file("MSFT", 3, 8, &[(99, 99)]));
    write(dir.path(), "QuoteData_c.dat", &quote_file("AAPL", 1, 2, &[(5, 5)]));
    write(dir.path(), "QuoteData_d.dat", &quote_file("MSFT", 1, 2, &[(7, 7)]));
    write(dir.path(), "QuoteData_e.dat", &quote_file("AAPL", 12, 29, &[(1, 100), (2, 200), (3, 300)]));
    write(dir.path(), "readme.txt", "AAPL is not a quote file\n");
    dir
}

#[test]
fn loads_only_requested_symbol_in_listing_order() {
    let dir = mixed_directory();
    let dataset = DataLoader::new().load(dir.path(), "AAPL").unwrap();

    assert_eq!(dataset.option(), "AAPL");
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.files(), listing_order(dir.path(), "AAPL").as_slice());

    // Day records line up with the files they came from.
    for (path, day) in dataset.files().iter().zip(dataset.days()) {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let expected = match name.as_str() {
            "QuoteData_a.dat" => ("03/08/2024", 30, 3),
            "QuoteData_c.dat" => ("01/02/2024", 5, 5),
            "QuoteData_e.dat" => ("12/29/2024", 6, 600),
            other => panic!("unexpected file {other}"),
        };
        assert_eq!(
            (day.date.as_str(), day.total_call_volume, day.total_put_volume),
            expected
        );
    }
}

#[test]
fn unknown_symbol_is_configuration_fault() {
    let dir = mixed_directory();
    let err = DataLoader::new().load(dir.path(), "GOOG").unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, LoaderError::UnknownOption { .. }));
}

#[test]
fn empty_directory_is_configuration_fault() {
    let dir = tempfile::tempdir().unwrap();
    let err = DataLoader::new().load(dir.path(), "AAPL").unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, LoaderError::NoQuoteFiles { .. }));
}

#[test]
fn clear_then_load_is_identical() {
    let dir = mixed_directory();
    let loader = DataLoader::new();

    let mut dataset = loader.load(dir.path(), "AAPL").unwrap();
    let first = render_table(dataset.days());
    let first_days = dataset.days().to_vec();

    dataset.clear();
    assert!(dataset.is_empty());
    assert_eq!(render_table(dataset.days()), "\n");

    let again = loader.load(dir.path(), "AAPL").unwrap();
    assert_eq!(again.days(), first_days.as_slice());
    assert_eq!(render_table(again.days()), first);

    dataset.reload(&loader).unwrap();
    assert_eq!(dataset, again);
}

#[test]
fn top_contracts_follow_volume() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<(u64, u64)> = vec![(3, 9), (1, 8), (4, 7), (1, 6), (5, 5), (9, 4), (2, 3), (6, 2)];
    write(dir.path(), "QuoteData1.dat", &quote_file("ASHR", 4, 15, &rows));

    let dataset = DataLoader::new().load(dir.path(), "ASHR").unwrap();
    let day = &dataset.days()[0];

    let calls: Vec<u64> = day.top(OptionSide::Call).iter().map(|o| o.amount()).collect();
    assert_eq!(calls, vec![3, 4, 5, 6, 9]);
    let puts: Vec<u64> = day.top(OptionSide::Put).iter().map(|o| o.amount()).collect();
    assert_eq!(puts, vec![5, 6, 7, 8, 9]);
    assert_eq!(day.top_calls[4].name(), "ASHR24C25");
    assert_eq!(day.total_call_volume, 31);
}

#[test]
fn bad_file_aborts_by_default_and_is_skipped_on_request() {
    let dir = mixed_directory();
    write(
        dir.path(),
        "QuoteData_z.dat",
        "AAPL (BROKEN),1,+0,\nXyz 01 2024\nheader\n",
    );

    let err = DataLoader::new().load(dir.path(), "AAPL").unwrap_err();
    assert!(!err.is_configuration());
    assert!(matches!(err.parse_error(), Some(ParseError::UnknownMonth(_))));

    let config = QuoteConfig {
        skip_invalid_files: true,
        ..Default::default()
    };
    let dataset = DataLoader::from_config(&config).load(dir.path(), "AAPL").unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.skipped().len(), 1);
    assert!(dataset.skipped()[0].path.ends_with("QuoteData_z.dat"));
    assert!(!dataset.files().iter().any(|p| p.ends_with("QuoteData_z.dat")));
}

#[test]
fn series_is_ordered_by_date() {
    let dir = mixed_directory();
    let dataset = DataLoader::new().load(dir.path(), "AAPL").unwrap();
    let series = VolumeSeries::from_days(dataset.option(), dataset.days()).unwrap();

    let dates: Vec<String> = series
        .points
        .iter()
        .map(|p| p.date.format("%m/%d/%Y").to_string())
        .collect();
    assert_eq!(dates, vec!["01/02/2024", "03/08/2024", "12/29/2024"]);
    assert!(series.points.windows(2).all(|w| w[0].day < w[1].day));
}
