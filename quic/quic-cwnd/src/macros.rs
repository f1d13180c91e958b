// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

/// Swallows its arguments when tracing is disabled
#[doc(hidden)]
#[macro_export]
macro_rules! __tracing_noop__ {
    ($($fmt:tt)*) => {};
}
