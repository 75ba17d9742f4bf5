macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12]);
    };
}

/// Builds a batch of [`Entry`](crate::Entry) items for
/// [`Container::with_entries`](crate::Container::with_entries) or [`Container::add`](crate::Container::add).
///
/// `provide(..)` registers a constructor, `value(..)` registers a pre-built value.
///
/// # Examples
/// ```rust
/// use core::convert::Infallible;
/// use psyringe::{entries, Container};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let container = Container::with_entries(entries![
///     value(2_i32),
///     provide(|n: i32| Ok::<_, Infallible>(n.to_string())),
/// ])?;
///
/// assert_eq!(container.get::<String>().await?, "2");
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! entries {
    (@entry provide ( $instantiator:expr )) => {
        $crate::Entry::constructor($instantiator)
    };
    (@entry value ( $value:expr )) => {
        $crate::Entry::value($value)
    };
    ( $( $kind:ident ( $($item:tt)+ ) ),* $(,)? ) => {{
        let entries: ::std::vec::Vec<$crate::Entry> = ::std::vec![
            $( $crate::entries!(@entry $kind ( $($item)+ )) ),*
        ];
        entries
    }};
}
