//! Sample entity with one date field and several ways to slice it.

use std::fmt;

use crate::error::IndexError;
use crate::multi::MultiIndex;

pub const NAME: &str = "name";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    /// YYYYMMDD, e.g. 20070725
    pub date: i32,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, date: i32) -> Self {
        Person {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date,
        }
    }

    pub fn year(&self) -> i32 {
        self.date / 10000
    }

    pub fn day(&self) -> i32 {
        self.date % 100
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.last_name, self.date)
    }
}

/// Three-letter month of a YYYYMMDD date, if the month is in range.
pub fn month_name(date: i32) -> Option<&'static str> {
    let month = date / 100 % 100;
    usize::try_from(month - 1)
        .ok()
        .and_then(|i| MONTHS.get(i))
        .copied()
}

/// Indexes `name`, `year`, `day` and `month` over [`Person`].
/// Dates with an out-of-range month file under `"???"`.
pub fn standard_index() -> Result<MultiIndex<Person>, IndexError> {
    MultiIndex::<Person>::builder()
        .index(NAME, |p: &Person| p.first_name.clone())
        .index(YEAR, Person::year)
        .index(DAY, Person::day)
        .index(MONTH, |p: &Person| month_name(p.date).unwrap_or("???"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    #[test]
    fn month_names() {
        assert_eq!(month_name(19640315), Some("Mar"));
        assert_eq!(month_name(20001231), Some("Dec"));
        assert_eq!(month_name(20000001), None);
        assert_eq!(month_name(20001301), None);
    }

    #[test]
    fn lookup_by_every_index() {
        let mut people = standard_index().unwrap();
        let ann = people.insert(Person::new("Ann", "Lee", 19640315));
        let bo = people.insert(Person::new("Bo", "Ray", 19640420));

        let year = people.index(YEAR).unwrap().lookup_exact(&1964).unwrap();
        assert_eq!(year.len(), 2);
        assert!(year.contains(&ann) && year.contains(&bo));

        let april = people.index(MONTH).unwrap().lookup_exact(&"Apr").unwrap();
        assert_eq!(april.to_vec(), vec![bo.clone()]);

        let fifteenth = people.index(DAY).unwrap().lookup_exact(&15).unwrap();
        assert_eq!(fifteenth.to_vec(), vec![ann.clone()]);

        let names = people.typed_index::<String>(NAME).unwrap();
        assert_eq!(names.lookup_exact("Ann").to_vec(), vec![ann.clone()]);

        // the erased path wants the owned key type
        let erased = people.index(NAME).unwrap();
        assert_eq!(
            erased.lookup_exact(&"Ann").unwrap_err(),
            IndexError::KeyTypeMismatch {
                index: NAME.into(),
                expected: std::any::type_name::<String>(),
            }
        );
        assert_eq!(erased.lookup_exact(&"Ann".to_string()).unwrap().len(), 1);

        assert!(people.remove(&ann));
        let year = people.index(YEAR).unwrap().lookup_exact(&1964).unwrap();
        assert_eq!(year.to_vec(), vec![bo]);
        assert!(!people
            .index(MONTH)
            .unwrap()
            .lookup_exact(&"Mar")
            .unwrap()
            .any());
    }

    #[test]
    fn same_person_twice_is_two_entities() {
        let mut people = standard_index().unwrap();
        let first = Handle::new(Person::new("Ann", "Lee", 19640315));
        let second = Handle::new((*first).clone());
        assert!(people.add(&first));
        assert!(people.add(&second));
        assert!(!people.add(&first));
        assert_eq!(people.index(NAME).unwrap().len(), 2);
    }

    #[test]
    fn last_page_by_name_in_reverse() {
        let mut people = standard_index().unwrap();
        for (first, date) in [
            ("Cleo", 19010101),
            ("Abe", 19020202),
            ("Fay", 19030303),
            ("Dan", 19040404),
            ("Eve", 19050505),
            ("Bea", 19060606),
        ] {
            people.insert(Person::new(first, "Doe", date));
        }

        let names = people.typed_index::<String>(NAME).unwrap();
        let last_page: Vec<_> = names
            .enumerate_ordered_rev()
            .take(2)
            .map(|p| p.first_name.as_str())
            .collect();
        assert_eq!(last_page, vec!["Fay", "Eve"]);

        let years = people.typed_index::<i32>(YEAR).unwrap();
        assert_eq!(years.lookup_range(1904..).count(), 3);
    }

    #[test]
    fn bad_month_files_under_placeholder() {
        let mut people = standard_index().unwrap();
        let odd = people.insert(Person::new("Al", "Odd", 19991399));
        let bucket = people.index(MONTH).unwrap().lookup_exact(&"???").unwrap();
        assert_eq!(bucket.to_vec(), vec![odd]);
    }
}
