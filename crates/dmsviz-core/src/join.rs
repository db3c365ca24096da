//! Joining auxiliary data
//!
//! Auxiliary tables (functional scores, extra filter or tooltip sources) are left-joined onto
//! the mutation data one after another on `(reference_site, wildtype, mutant)`.
//!
//! - An auxiliary table with more than one row per key is rejected; the join would be ambiguous.
//! - Columns the mutation data already has are dropped from the auxiliary table with a warning.
//! - Rows of the mutation data without a match keep empty cells for the joined columns, so a
//!   join never adds or removes rows.
use crate::alphabet::Alphabet;
use crate::error::{examples, Result, ValidationError};
use crate::schema::{TableSchema, MUTANT, REFERENCE_SITE, WILDTYPE};
use crate::table::Table;
use itertools::Itertools;
use std::collections::HashMap;

pub const JOIN_KEYS: [&str; 3] = [REFERENCE_SITE, WILDTYPE, MUTANT];

type JoinKey<'a> = (&'a str, &'a str, &'a str);

fn join_keys(table: &Table) -> Vec<JoinKey<'_>> {
    let column = |name: &str| -> Vec<&str> {
        table
            .text_values(name)
            .map(|values| values.collect())
            .unwrap_or_default()
    };
    let (sites, wildtypes, mutants) = (column(REFERENCE_SITE), column(WILDTYPE), column(MUTANT));
    sites
        .into_iter()
        .zip(wildtypes)
        .zip(mutants)
        .map(|((site, wildtype), mutant)| (site, wildtype, mutant))
        .collect()
}

/// Left-join each of `join_tables` onto the validated mutation data, in order.
pub fn join_additional_data(
    mutations: Table,
    join_tables: Vec<Table>,
    alphabet: &Alphabet,
) -> Result<Table> {
    join_tables
        .into_iter()
        .enumerate()
        .try_fold(mutations, |mutations, (i, table)| {
            let name = format!("join data table #{}", i + 1);
            join_table(mutations, table, &name, alphabet)
        })
}

fn join_table(mut mutations: Table, other: Table, name: &str, alphabet: &Alphabet) -> Result<Table> {
    let mut other = TableSchema::new(name)
        .with_site_alias()
        .residues(alphabet, &[WILDTYPE, MUTANT])
        .validate(other)?;

    let keys = join_keys(&other);
    let duplicated: Vec<String> = keys
        .iter()
        .duplicates()
        .map(|(site, wildtype, mutant)| format!("({site}, {wildtype}, {mutant})"))
        .collect();
    if !duplicated.is_empty() {
        return Err(ValidationError::DuplicateJoinKey {
            table: name.to_string(),
            count: duplicated.len(),
            examples: examples(duplicated),
        });
    }

    let collisions: Vec<String> = other
        .columns()
        .iter()
        .filter(|column| !JOIN_KEYS.contains(&column.as_str()) && mutations.has_column(column))
        .cloned()
        .collect();
    if !collisions.is_empty() {
        tracing::warn!(
            "the following column(s) of {name} are already in the mutation data and will be dropped: {}",
            collisions.join(", ")
        );
        other.drop_columns(&collisions);
    }

    let added: Vec<String> = other
        .columns()
        .iter()
        .filter(|column| !JOIN_KEYS.contains(&column.as_str()) && column.as_str() != "site")
        .cloned()
        .unique()
        .collect();
    let lookup: HashMap<JoinKey<'_>, usize> = join_keys(&other)
        .into_iter()
        .enumerate()
        .map(|(row, key)| (key, row))
        .collect();
    let matches: Vec<Option<usize>> = join_keys(&mutations)
        .into_iter()
        .map(|key| lookup.get(&key).copied())
        .collect();

    for column in &added {
        let Some(idx) = other.column_index(column) else {
            continue;
        };
        let values = matches
            .iter()
            .map(|row| row.and_then(|row| other.cell(row, idx)).map(str::to_string))
            .collect();
        mutations.push_column(column, values);
    }

    Ok(mutations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutations() -> Table {
        Table::from_strs(
            &["reference_site", "wildtype", "mutant", "escape", "condition"],
            &[
                &["10", "A", "G", "0.1", "class 1"],
                &["10", "A", "G", "0.4", "class 2"],
                &["10", "A", "T", "0.2", "class 1"],
                &["11", "K", "R", "0.3", "class 1"],
            ],
        )
    }

    #[test]
    fn test_left_join() {
        let other = Table::from_strs(
            &["site", "wildtype", "mutant", "effect", "escape"],
            &[&["10", "A", "G", "-1.5", "9"], &["11", "K", "R", "0.2", "9"], &["12", "L", "P", "-3", "9"]],
        );
        let joined = join_additional_data(mutations(), vec![other], &Alphabet::default()).unwrap();

        assert_eq!(joined.n_rows(), 4);
        assert_eq!(
            joined.columns(),
            &["reference_site", "wildtype", "mutant", "escape", "condition", "effect"]
        );
        let effect: Vec<Option<&str>> = joined.values("effect").unwrap().collect();
        assert_eq!(effect, vec![Some("-1.5"), Some("-1.5"), None, Some("0.2")]);
        // the colliding column was dropped, the original values survive
        let escape: Vec<&str> = joined.text_values("escape").unwrap().collect();
        assert_eq!(escape, vec!["0.1", "0.4", "0.2", "0.3"]);
    }

    #[test]
    fn test_duplicate_join_keys() {
        let columns = ["reference_site", "wildtype", "mutant", "effect"];
        let other = Table::from_strs(
            &columns,
            &[&["10", "A", "G", "-1.5"], &["10", "A", "G", "-1.0"], &["11", "K", "R", "0.2"]],
        );
        let err =
            join_additional_data(mutations(), vec![other], &Alphabet::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateJoinKey {
                table: "join data table #1".into(),
                count: 1,
                examples: vec!["(10, A, G)".into()],
            }
        );

        // deduplicated, the join adds exactly the non-colliding column
        let other = Table::from_strs(&columns, &[&["10", "A", "G", "-1.5"], &["11", "K", "R", "0.2"]]);
        let joined = join_additional_data(mutations(), vec![other], &Alphabet::default()).unwrap();
        assert_eq!(joined.columns().len(), mutations().columns().len() + 1);
        let effect: Vec<&str> = joined.text_values("effect").unwrap().collect();
        assert_eq!(effect, vec!["-1.5", "-1.5", "", "0.2"]);
    }

    #[test]
    fn test_sequential_joins() {
        let first = Table::from_strs(
            &["reference_site", "wildtype", "mutant", "effect"],
            &[&["10", "A", "G", "-1.5"]],
        );
        let second = Table::from_strs(
            &["reference_site", "wildtype", "mutant", "effect", "times_seen"],
            &[&["10", "A", "T", "7", "3"]],
        );
        let joined =
            join_additional_data(mutations(), vec![first, second], &Alphabet::default()).unwrap();
        // `effect` from the second table collides with the first join and is dropped
        let effect: Vec<&str> = joined.text_values("effect").unwrap().collect();
        assert_eq!(effect, vec!["-1.5", "-1.5", "", ""]);
        let seen: Vec<&str> = joined.text_values("times_seen").unwrap().collect();
        assert_eq!(seen, vec!["", "", "3", ""]);
    }

    #[test]
    fn test_join_schema_and_alphabet() {
        let other = Table::from_strs(&["reference_site", "wildtype", "effect"], &[&["10", "A", "1"]]);
        let err =
            join_additional_data(mutations(), vec![other], &Alphabet::default()).unwrap_err();
        assert!(matches!(err, ValidationError::Schema { .. }));

        let other = Table::from_strs(
            &["reference_site", "wildtype", "mutant", "effect"],
            &[&["10", "A", "J", "1"]],
        );
        let err =
            join_additional_data(mutations(), vec![other], &Alphabet::default()).unwrap_err();
        assert!(matches!(err, ValidationError::Alphabet { .. }));
    }
}
