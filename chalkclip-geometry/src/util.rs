//               Copyright John Nunley, 2022.
// Distributed under the Boost Software License, Version 1.0.
//       (See accompanying file LICENSE or copy at
//         https://www.boost.org/LICENSE_1_0.txt)

use num_traits::Float;

/// Tell if two numbers are within `tolerance` of each other.
pub(crate) fn approx_eq_within<Num: Float>(a: Num, b: Num, tolerance: Num) -> bool {
    (a - b).abs() <= tolerance
}

/// Round a float towards negative infinity and saturate it into an `i32`.
pub(crate) fn floor_i32<Num: Float>(n: Num) -> i32 {
    n.floor().to_i32().unwrap_or(if n < Num::zero() { i32::MIN } else { i32::MAX })
}

/// Round a float towards positive infinity and saturate it into an `i32`.
pub(crate) fn ceil_i32<Num: Float>(n: Num) -> i32 {
    n.ceil().to_i32().unwrap_or(if n < Num::zero() { i32::MIN } else { i32::MAX })
}
