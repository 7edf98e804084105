//! Property tests for preprocessing invariants.
//!
//! Uses proptest to verify:
//! 1. Cleaning never grows the table — output rows ≤ input rows
//! 2. Cleaned frames contain no NaN and no ±inf in any cell
//! 3. Entity keys are exactly `{country}_{code}` and pair uniquely with year
//! 4. Fully-finite inputs survive untouched (no spurious drops)

use proptest::prelude::*;
use panellab_core::frame::RawTable;
use panellab_core::preprocess::preprocess_panel;

// ── Strategies (proptest) ────────────────────────────────────────────

/// A cell value: usually an ordinary float, sometimes NaN or ±inf.
fn arb_cell() -> BoxedStrategy<f64> {
    prop_oneof![
        8 => -100.0..100.0_f64,
        1 => Just(f64::NAN),
        1 => prop_oneof![Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ]
    .boxed()
}

fn arb_finite_cell() -> BoxedStrategy<f64> {
    (-100.0..100.0_f64).boxed()
}

/// A balanced table over `entities × years` with a (entity, year)-unique
/// index by construction, filled with cells from `cell`.
fn arb_table(cell: BoxedStrategy<f64>) -> impl Strategy<Value = RawTable> {
    (1..4_usize, 2..5_usize).prop_flat_map(move |(entities, years)| {
        let n = entities * years;
        (
            prop::collection::vec(cell.clone(), n),
            prop::collection::vec(cell.clone(), n),
        )
            .prop_map(move |(dep, reg)| {
                let mut country = Vec::with_capacity(n);
                let mut code = Vec::with_capacity(n);
                let mut year = Vec::with_capacity(n);
                for e in 0..entities {
                    for t in 0..years {
                        country.push(format!("C{e}"));
                        code.push(format!("{e}"));
                        year.push(2000 + t as i32);
                    }
                }
                RawTable {
                    country,
                    code,
                    year,
                    columns: vec![
                        ("log_dollar".into(), dep),
                        ("log_gdp".into(), reg),
                        ("const".into(), vec![1.0; n]),
                    ],
                }
            })
    })
}

proptest! {
    /// Row dropping is monotonic and the output is fully finite.
    #[test]
    fn cleaning_drops_monotonically_and_leaves_finite_cells(
        table in arb_table(arb_cell()),
    ) {
        let height = table.height();
        let frame = preprocess_panel(table).unwrap();
        prop_assert!(frame.n_obs() <= height);
        for name in frame.column_names().to_vec() {
            let col = frame.column(&name).unwrap();
            prop_assert!(col.iter().all(|v| v.is_finite()));
        }
    }

    /// A fully-finite table loses no rows, and the index is the expected
    /// (country_code, year) grid.
    #[test]
    fn finite_input_is_lossless(table in arb_table(arb_finite_cell())) {
        let height = table.height();
        let country = table.country.clone();
        let code = table.code.clone();
        let frame = preprocess_panel(table).unwrap();

        prop_assert_eq!(frame.n_obs(), height);
        for (i, entity) in frame.entities().iter().enumerate() {
            prop_assert_eq!(entity.clone(), format!("{}_{}", country[i], code[i]));
        }
    }

    /// Dropped columns never resurface.
    #[test]
    fn identifier_columns_do_not_survive(table in arb_table(arb_finite_cell())) {
        let frame = preprocess_panel(table).unwrap();
        prop_assert!(frame.column("const").is_none());
        prop_assert!(frame.column("country").is_none());
        prop_assert!(frame.column("code").is_none());
    }
}
