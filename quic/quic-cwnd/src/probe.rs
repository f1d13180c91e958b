// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#[doc(hidden)]
#[macro_export]
macro_rules! __probe_define__ {
    (extern "probe" {
        $(
            $(
                #[doc = $doc:tt]
            )*
            #[link_name = $link_name:ident]
            $vis:vis fn $fun:ident($($arg:ident: $arg_t:ty),* $(,)?);
        )*
    }) => {
        $(
            $(
                #[doc = $doc]
            )*
            #[inline(always)]
            $vis fn $fun($($arg: $arg_t),*) {
                $crate::probe::__trace!(
                    name: stringify!($link_name),
                    target: concat!(module_path!(), "::", stringify!($fun)),
                    $(
                        $arg = ?$arg,
                    )*
                );

                // make sure all of the args implement Arg
                $(
                    let _ = $crate::probe::Arg::into_field($arg);
                )*
            }
        )*
    }
}

#[doc(inline)]
pub use __probe_define__ as define;

#[cfg(feature = "probe-tracing")]
#[doc(hidden)]
pub use tracing::trace as __trace;

#[cfg(not(feature = "probe-tracing"))]
#[doc(hidden)]
pub use crate::__tracing_noop__ as __trace;

/// Values that can be attached to a probe
pub trait Arg: Copy + core::fmt::Debug {
    fn into_field(self) -> Self {
        self
    }
}

macro_rules! impl_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Arg for $ty {}
        )*
    }
}

impl_arg!(u8, u16, u32, u64, usize, i64, f64, bool, core::time::Duration);

impl Arg for crate::time::Timestamp {}
