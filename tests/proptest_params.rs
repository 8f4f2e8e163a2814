use proptest::prelude::*;

use monosynth::{ParamField, ParamValue, ParameterSet, ValidationError};

fn numeric_fields() -> impl Strategy<Value = ParamField> {
    prop::sample::select(
        ParamField::ALL
            .into_iter()
            .filter(|f| f.range().is_some())
            .collect::<Vec<_>>(),
    )
}

fn in_range() -> impl Strategy<Value = (ParamField, f64)> {
    numeric_fields().prop_flat_map(|field| {
        let (min, max) = field.range().unwrap_or((0.0, 0.0));
        (Just(field), min..=max)
    })
}

fn out_of_range() -> impl Strategy<Value = (ParamField, f64)> {
    numeric_fields().prop_flat_map(|field| {
        let (min, max) = field.range().unwrap_or((0.0, 0.0));
        let below = (min - 1_000.0)..(min - 1e-6);
        let above = (max + 1e-6)..(max + 1_000.0);
        (Just(field), prop_oneof![below, above])
    })
}

proptest! {
    #[test]
    fn in_range_values_are_stored((field, value) in in_range()) {
        let params = ParameterSet::default();
        let next = params.with_field(field, value).unwrap();

        let stored = next.get(field).as_number().unwrap();
        if field.is_time() {
            // zero-length stages are stretched to a minimal ramp
            prop_assert!(stored >= value && stored - value < 1e-3);
        } else {
            prop_assert_eq!(stored, value);
        }
        prop_assert!(next.validate().is_ok());

        for other in ParamField::ALL.into_iter().filter(|&f| f != field) {
            prop_assert_eq!(next.get(other), params.get(other));
        }
    }

    #[test]
    fn out_of_range_values_are_rejected((field, value) in out_of_range()) {
        let params = ParameterSet::default();
        let err = params.with_field(field, value).unwrap_err();

        let is_out_of_range = matches!(err, ValidationError::OutOfRange { .. });
        prop_assert!(is_out_of_range);
        prop_assert_eq!(params, ParameterSet::default());
    }

    #[test]
    fn non_finite_values_are_rejected(field in numeric_fields(), value in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]) {
        let err = ParameterSet::default().with_field(field, ParamValue::Number(value)).unwrap_err();
        let is_not_finite = matches!(err, ValidationError::NotFinite { .. });
        prop_assert!(is_not_finite);
    }
}
