use std::str::FromStr;

use crate::constants::MAX_PRIORITY;
use crate::error::DispatcherError;
use crate::registry::Priority;

#[test]
fn test_priority_from_non_negative_integers() {
    assert_eq!(Priority::try_from(0i64).unwrap().value(), 0);
    assert_eq!(Priority::try_from(255i64).unwrap().value(), 255);
    assert_eq!(Priority::try_from(MAX_PRIORITY).unwrap().value(), u32::MAX);
}

#[test]
fn test_priority_rejects_negative_and_oversized() {
    for value in [-1i64, i64::MIN, MAX_PRIORITY + 1] {
        match Priority::try_from(value) {
            Err(DispatcherError::InvalidPriority { value: reported }) => {
                assert_eq!(reported, value.to_string())
            }
            other => panic!("Expected InvalidPriority for {}, got {:?}", value, other),
        }
    }
}

#[test]
fn test_priority_parses_digit_strings_only() {
    assert_eq!(Priority::from_str("45").unwrap(), Priority::new(45));
    assert_eq!(Priority::from_str("007").unwrap(), Priority::new(7));

    for text in ["", "-1", "+1", "1.5", " 3", "abc", "99999999999"] {
        assert!(
            matches!(Priority::from_str(text), Err(DispatcherError::InvalidPriority { .. })),
            "'{}' should be rejected",
            text
        );
    }
}

#[test]
fn test_priority_ordering() {
    let mut priorities =
        vec![Priority::new(255), Priority::new(30), Priority::new(45), Priority::new(0)];
    priorities.sort();
    let values: Vec<u32> = priorities.iter().map(Priority::value).collect();
    assert_eq!(values, vec![0, 30, 45, 255]);
    assert_eq!(Priority::default(), Priority::new(0));
    assert_eq!(Priority::new(46).to_string(), "46");
}
