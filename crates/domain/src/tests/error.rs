// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidMonthKey {
        key: String::from("2026-13"),
        reason: String::from("month must be between 01 and 12"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid month key '2026-13': month must be between 01 and 12"
    );

    let err: DomainError = DomainError::InvalidFilterMode(String::from("some"));
    assert_eq!(
        format!("{err}"),
        "Invalid preferred staff filter mode 'some'. Must be all, specific, or none"
    );

    let err: DomainError = DomainError::InvalidDimension(String::from("team"));
    assert_eq!(
        format!("{err}"),
        "Invalid selection dimension 'team'. Must be skill, client, or preferred_staff"
    );

    let err: DomainError = DomainError::DateOutOfRange {
        operation: String::from("computing last day of 9999-12"),
    };
    assert_eq!(
        format!("{err}"),
        "Date out of range while computing last day of 9999-12"
    );
}

#[test]
fn test_domain_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::InvalidFilterMode(String::new()));
    assert!(err.source().is_none());
}
