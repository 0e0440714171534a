//! Declarative macros for ergonomic effect construction
//!
//! Most storefront effects are "call the API, map the result to an action",
//! which these macros keep short.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::async_effect;
///
/// async_effect! {
///     match api.brands().await {
///         Ok(brands) => Some(CatalogAction::BrandsLoaded { brands }),
///         Err(error) => Some(CatalogAction::BrandsFailed { error: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(500),
///     action: CatalogAction::SearchDebounceElapsed { generation: 3 }
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        PageLoaded { items: usize },
        DebounceElapsed,
    }

    #[tokio::test]
    async fn test_async_effect_macro() {
        let items = 7;
        let effect = async_effect! {
            Some(TestAction::PageLoaded { items })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds Effect::Future");
        };
        assert_eq!(fut.await, Some(TestAction::PageLoaded { items: 7 }));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_millis(500),
            action: TestAction::DebounceElapsed
        };

        assert!(matches!(
            effect,
            Effect::Delay { duration, .. } if duration == Duration::from_millis(500)
        ));
    }
}
