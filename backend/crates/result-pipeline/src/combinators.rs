//! Synchronous pipeline operators.
//!
//! Every operator skips its closure once the outcome has failed. The `bind`
//! family and `unless` convert panics (and `Err` values for `try_bind`) into
//! [`ExceptionError`] failures; `map` and `tap` assume their closures cannot
//! fail and let panics propagate.

use std::error::Error as StdError;

use crate::error::{ExceptionError, ResultError};
use crate::exception::contain;
use crate::mapper::Mapper;
use crate::outcome::Outcome;

impl<T> Outcome<T> {
    /// Chain a step that returns its own outcome.
    ///
    /// Messages gathered so far are kept in front of the step's messages. A
    /// panic inside `step` yields a failure carrying one [`ExceptionError`].
    ///
    /// # Examples
    /// ```
    /// use result_pipeline::{Outcome, ResultError};
    ///
    /// fn half(value: u32) -> Outcome<u32> {
    ///     if value % 2 == 0 {
    ///         Outcome::success(value / 2)
    ///     } else {
    ///         Outcome::failure_with(ResultError::validation("odd"))
    ///     }
    /// }
    ///
    /// assert_eq!(Outcome::success(8).bind(half).bind(half).into_value(), Some(2));
    /// assert!(Outcome::success(6).bind(half).bind(half).is_failure());
    /// ```
    pub fn bind<U, F>(self, step: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        let (state, messages) = self.into_parts();
        match state {
            Err(errors) => Outcome::failed(errors, messages),
            Ok(value) => match contain(|| step(value)) {
                Ok(next) => next.with_prior_messages(messages),
                Err(error) => Outcome::failed(vec![error.into()], messages),
            },
        }
    }

    /// Chain a fallible step returning a plain value.
    ///
    /// `Ok` becomes a success; `Err` or a panic becomes a failure carrying
    /// one [`ExceptionError`].
    pub fn try_bind<U, E, F>(self, step: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Result<U, E>,
        E: StdError + Send + Sync + 'static,
    {
        let (state, messages) = self.into_parts();
        match state {
            Err(errors) => Outcome::failed(errors, messages),
            Ok(value) => {
                let result = match contain(|| step(value)) {
                    Ok(Ok(next)) => Ok(next),
                    Ok(Err(error)) => Err(ExceptionError::new(error)),
                    Err(error) => Err(error),
                };
                match result {
                    Ok(next) => Outcome::from_parts(Ok(next), messages),
                    Err(error) => Outcome::failed(vec![error.into()], messages),
                }
            }
        }
    }

    /// Compute an independent inner outcome from the current value and merge
    /// both values on success.
    ///
    /// `merge` runs only when both outcomes succeed. An inner failure is
    /// propagated with its errors; messages from both sides are kept.
    pub fn bind_result<U, V, F, M>(self, step: F, merge: M) -> Outcome<V>
    where
        F: FnOnce(&T) -> Outcome<U>,
        M: FnOnce(T, U) -> V,
    {
        let (state, messages) = self.into_parts();
        let value = match state {
            Err(errors) => return Outcome::failed(errors, messages),
            Ok(value) => value,
        };
        let inner = match contain(|| step(&value)) {
            Ok(inner) => inner.with_prior_messages(messages),
            Err(error) => return Outcome::failed(vec![error.into()], messages),
        };
        let (inner_state, messages) = inner.into_parts();
        match inner_state {
            Err(errors) => Outcome::failed(errors, messages),
            Ok(inner_value) => match contain(|| merge(value, inner_value)) {
                Ok(merged) => Outcome::from_parts(Ok(merged), messages),
                Err(error) => Outcome::failed(vec![error.into()], messages),
            },
        }
    }

    /// Transform the success value.
    pub fn map<U, F>(self, transform: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        let (state, messages) = self.into_parts();
        Outcome::from_parts(state.map(transform), messages)
    }

    /// Convert the success value via [`From`].
    pub fn map_into<U>(self) -> Outcome<U>
    where
        U: From<T>,
    {
        self.map(U::from)
    }

    /// Convert the success value with a [`Mapper`].
    pub fn map_with<U, M>(self, mapper: &M) -> Outcome<U>
    where
        M: Mapper<T, U> + ?Sized,
    {
        self.map(|value| mapper.map(value))
    }

    /// Rewrite each error of a failed outcome.
    pub fn map_errors<F>(self, rewrite: F) -> Self
    where
        F: FnMut(ResultError) -> ResultError,
    {
        let (state, messages) = self.into_parts();
        let state = state.map_err(|errors| errors.into_iter().map(rewrite).collect());
        Self::from_parts(state, messages)
    }

    /// Run a side effect on the success value without changing the outcome.
    pub fn tap<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Some(value) = self.value() {
            action(value);
        }
        self
    }

    /// Run a side effect on the errors of a failed outcome.
    pub fn tap_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&[ResultError]),
    {
        if self.is_failure() {
            action(self.errors());
        }
        self
    }

    /// Fail with `error` when `predicate` does not hold for the value.
    pub fn ensure<F>(self, predicate: F, error: impl Into<ResultError>) -> Self
    where
        F: FnOnce(&T) -> bool,
    {
        self.ensure_with(predicate, |_| error.into())
    }

    /// Like [`Self::ensure`] but builds the error from the rejected value.
    pub fn ensure_with<F, E>(self, predicate: F, error: E) -> Self
    where
        F: FnOnce(&T) -> bool,
        E: FnOnce(&T) -> ResultError,
    {
        let rejection = match self.value() {
            Some(value) => {
                if predicate(value) {
                    return self;
                }
                error(value)
            }
            None => return self,
        };
        self.with_error(rejection)
    }

    /// Fail with the check's errors when `check` fails; otherwise continue
    /// with the original value. The check's own value is discarded. A panic
    /// inside `check` yields a failure carrying one [`ExceptionError`].
    pub fn unless<V, F>(self, check: F) -> Self
    where
        F: FnOnce(&T) -> Outcome<V>,
    {
        let checked = match self.value() {
            Some(value) => contain(|| check(value)).unwrap_or_else(Outcome::failure_with),
            None => return self,
        };
        self.absorb_check(checked)
    }

    /// Apply the sub-chain `then` only when `predicate` holds for the value.
    pub fn when<P, F>(self, predicate: P, then: F) -> Self
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(Self) -> Self,
    {
        let apply = match self.value() {
            Some(value) => predicate(value),
            None => false,
        };
        if apply { then(self) } else { self }
    }

    pub(crate) fn absorb_check<V>(self, checked: Outcome<V>) -> Self {
        if checked.is_success() {
            return self;
        }
        let (check_state, check_messages) = checked.into_parts();
        let errors = check_state.err().unwrap_or_default();
        let (_, mut messages) = self.into_parts();
        messages.extend(check_messages);
        Self::failed(errors, messages)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the synchronous operators.

    use std::cell::Cell;
    use std::fmt;

    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug)]
    struct ParseFailure;

    impl fmt::Display for ParseFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("not a number")
        }
    }

    impl StdError for ParseFailure {}

    fn failing() -> Outcome<u32> {
        Outcome::failure_with(ResultError::validation("first failure")).with_message("before")
    }

    #[test]
    fn failure_is_absorbing_and_skips_every_step() {
        let calls = Cell::new(0_u32);
        let bump = || calls.set(calls.get() + 1);

        let outcome = failing()
            .bind(|value| {
                bump();
                Outcome::success(value + 1)
            })
            .map(|value| {
                bump();
                value * 2
            })
            .tap(|_| bump())
            .ensure(
                |_| {
                    bump();
                    false
                },
                ResultError::conflict("never attached"),
            )
            .unless(|_| {
                bump();
                Outcome::ok()
            });

        assert_eq!(calls.get(), 0);
        let messages: Vec<&str> = outcome.errors().iter().map(ResultError::message).collect();
        assert_eq!(messages, ["first failure"]);
        assert_eq!(outcome.messages(), ["before"]);
    }

    #[test]
    fn bind_preserves_prior_messages() {
        let outcome = Outcome::success(1)
            .with_message("loaded")
            .bind(|value| Outcome::success(value + 1).with_message("incremented"))
            .map(|value| value * 10);

        assert_eq!(outcome.value(), Some(&20));
        assert_eq!(outcome.messages(), ["loaded", "incremented"]);
    }

    #[test]
    fn bind_contains_panics_as_a_single_exception_error() {
        let outcome: Outcome<u32> = Outcome::success(1).bind(|_| panic!("database exploded"));

        assert!(outcome.is_failure());
        assert_eq!(outcome.errors().len(), 1);
        match outcome.errors().first() {
            Some(ResultError::Exception(error)) => {
                assert!(error.is_panic());
                assert!(error.message().contains("database exploded"));
            }
            other => panic!("expected exception error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("12", Some(12))]
    #[case("twelve", None)]
    fn try_bind_converts_errors(#[case] input: &str, #[case] expected: Option<u32>) {
        let outcome = Outcome::success(input.to_owned()).try_bind(|text| {
            text.parse::<u32>().map_err(|_| ParseFailure)
        });

        assert_eq!(outcome.value().copied(), expected);
        if expected.is_none() {
            assert!(outcome.has_error(ErrorKind::Exception));
            assert_eq!(outcome.errors().len(), 1);
        }
    }

    #[test]
    fn bind_result_merges_only_when_both_succeed() {
        let merges = Cell::new(0_u32);
        let outcome = Outcome::success(2).bind_result(
            |value| Outcome::success(value * 100).with_message("inner"),
            |outer, inner| {
                merges.set(merges.get() + 1);
                outer + inner
            },
        );
        assert_eq!(outcome.value(), Some(&202));
        assert_eq!(outcome.messages(), ["inner"]);
        assert_eq!(merges.get(), 1);
    }

    #[test]
    fn bind_result_propagates_inner_failure_without_merging() {
        let merges = Cell::new(0_u32);
        let outcome = Outcome::success(2_u32).with_message("outer").bind_result(
            |_| Outcome::<u32>::failure_with(ResultError::not_found("sequence")),
            |outer, inner| {
                merges.set(merges.get() + 1);
                outer + inner
            },
        );
        assert!(outcome.has_error(ErrorKind::NotFound));
        assert_eq!(outcome.messages(), ["outer"]);
        assert_eq!(merges.get(), 0);
    }

    #[test]
    fn bind_result_keeps_outer_failure_and_skips_inner() {
        let inner_calls = Cell::new(0_u32);
        let outcome = failing().bind_result(
            |_| {
                inner_calls.set(inner_calls.get() + 1);
                Outcome::success(1)
            },
            |outer, inner| outer + inner,
        );
        assert_eq!(inner_calls.get(), 0);
        assert!(outcome.has_error(ErrorKind::Validation));
    }

    #[test]
    fn ensure_attaches_error_when_predicate_fails() {
        let outcome = Outcome::success(-3).ensure(
            |value| *value >= 0,
            ResultError::invalid_field("amount", "must not be negative"),
        );
        assert_eq!(outcome.errors().first().and_then(ResultError::field), Some("amount"));
    }

    #[test]
    fn unless_discards_check_value_and_keeps_original() {
        let outcome = Outcome::success("alice").unless(|_| Outcome::success(999));
        assert_eq!(outcome.value(), Some(&"alice"));

        let rejected = Outcome::success("alice")
            .unless(|_| Outcome::ok().with_error(ResultError::validation("taken")).with_message("checked"));
        assert!(rejected.has_error(ErrorKind::Validation));
        assert_eq!(rejected.messages(), ["checked"]);
    }

    #[test]
    fn when_applies_sub_chain_only_if_predicate_holds() {
        let add_ten = |outcome: Outcome<i32>| outcome.map(|value| value + 10);
        assert_eq!(
            Outcome::success(1).when(|value| *value > 0, add_ten).value(),
            Some(&11)
        );
        assert_eq!(
            Outcome::success(-1).when(|value| *value > 0, add_ten).value(),
            Some(&-1)
        );
    }

    #[test]
    fn tap_failure_sees_errors() {
        let seen = Cell::new(0_usize);
        let outcome = failing().tap_failure(|errors| seen.set(errors.len()));
        assert_eq!(seen.get(), 1);
        assert!(outcome.has_error(ErrorKind::Validation));
    }

    #[test]
    fn unless_contains_panicking_checks() {
        let outcome = Outcome::success(1_u32)
            .with_message("loaded")
            .unless(|_| -> Outcome { panic!("rule exploded") });

        assert_eq!(outcome.errors().len(), 1);
        assert!(outcome.has_error(ErrorKind::Exception));
        assert_eq!(outcome.messages(), ["loaded"]);
    }

    #[test]
    fn map_with_uses_mapper() {
        let mapper = |value: u32| format!("#{value}");
        let outcome = Outcome::success(7_u32).map_with(&mapper);
        assert_eq!(outcome.value().map(String::as_str), Some("#7"));
    }

    #[test]
    fn map_errors_rewrites_failures() {
        let outcome = failing().map_errors(|error| ResultError::conflict(error.message()));
        assert!(outcome.has_error(ErrorKind::Conflict));
    }
}
