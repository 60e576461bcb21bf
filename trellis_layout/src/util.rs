// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Smallest `s` with `s * s >= num`.
pub(crate) const fn isqrt_ceil(num: usize) -> usize {
    let s = num.isqrt();
    if s * s == num { s } else { s + 1 }
}
