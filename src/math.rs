pub use quaternion::{id as quaternion_id, Quaternion};
pub use vecmath::{
    mat4_id, row_mat4_mul, row_mat4_transform, vec4_add, vec4_scale, Matrix4, Vector3,
};

///
/// Above this cosine of the angle between two rotations, slerp falls back
/// to normalized lerp since sin(theta) is too close to zero
///
const SLERP_DOT_THRESHOLD: f32 = 0.9995;

/// Squared length under which a quaternion is treated as degenerate
const DEGENERATE_LENGTH_SQUARED: f32 = 1.0e-12;

///
/// Matrix with every element set to zero
///
pub fn mat4_zero() -> Matrix4<f32> {
    [[0.0; 4]; 4]
}

///
/// Returns `acc + m * weight`, element-wise
///
pub fn mat4_add_weighted(acc: Matrix4<f32>, m: &Matrix4<f32>, weight: f32) -> Matrix4<f32> {
    [
        vec4_add(acc[0], vec4_scale(m[0], weight)),
        vec4_add(acc[1], vec4_scale(m[1], weight)),
        vec4_add(acc[2], vec4_scale(m[2], weight)),
        vec4_add(acc[3], vec4_scale(m[3], weight)),
    ]
}

///
/// Linearly maps `val` from the range [in_min, in_max] to [out_min, out_max].
/// An empty input range maps everything to `out_max`.
///
pub fn remap(val: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() <= f32::EPSILON {
        return out_max;
    }
    out_min + (out_max - out_min) * ((val - in_min) / span)
}

pub fn quaternion_normalize(q: Quaternion<f32>) -> Quaternion<f32> {
    let len_squared = quaternion::dot(q, q);
    if !(len_squared > DEGENERATE_LENGTH_SQUARED) || !len_squared.is_finite() {
        return quaternion_id();
    }
    quaternion::scale(q, 1.0 / len_squared.sqrt())
}

///
/// Normalized linear interpolation between two rotations, along the shortest path
///
pub fn lerp_quaternion(
    q1: &Quaternion<f32>,
    q2: &Quaternion<f32>,
    blend_factor: &f32,
) -> Quaternion<f32> {
    let dot = quaternion::dot(*q1, *q2);

    let s = 1.0 - blend_factor;
    let t = if dot > 0.0 { *blend_factor } else { -blend_factor };

    quaternion_normalize(quaternion::add(quaternion::scale(*q1, s), quaternion::scale(*q2, t)))
}

///
/// Spherical linear interpolation between two rotations, along the shortest path.
///
/// Nearly parallel inputs fall back to `lerp_quaternion`. Opposite-facing inputs
/// are folded onto the same hemisphere first, so the arc is never wider than PI/2
/// in quaternion space and `acos` always stays in its domain.
///
pub fn slerp_quaternion(
    q1: &Quaternion<f32>,
    q2: &Quaternion<f32>,
    blend_factor: &f32,
) -> Quaternion<f32> {
    let mut end = *q2;
    let mut dot = quaternion::dot(*q1, end);

    if dot < 0.0 {
        end = quaternion::scale(end, -1.0);
        dot = -dot;
    }

    if dot > SLERP_DOT_THRESHOLD {
        return lerp_quaternion(q1, &end, blend_factor);
    }

    let theta = dot.min(1.0).acos();
    let sin_theta = theta.sin();

    let w1 = ((1.0 - blend_factor) * theta).sin() / sin_theta;
    let w2 = (blend_factor * theta).sin() / sin_theta;

    quaternion_normalize(quaternion::add(quaternion::scale(*q1, w1), quaternion::scale(end, w2)))
}

pub fn lerp_vector3(v1: &Vector3<f32>, v2: &Vector3<f32>, blend_factor: &f32) -> Vector3<f32> {
    interpolation::lerp(v1, v2, blend_factor)
}

///
/// Rotation matrix for a unit quaternion, row-major (column vectors)
///
pub fn quaternion_to_matrix(q: Quaternion<f32>) -> Matrix4<f32> {

    let w = q.0;
    let x = q.1[0];
    let y = q.1[1];
    let z = q.1[2];

    let x2 = x + x;
    let y2 = y + y;
    let z2 = z + z;

    let xx2 = x2 * x;
    let xy2 = x2 * y;
    let xz2 = x2 * z;

    let yy2 = y2 * y;
    let yz2 = y2 * z;
    let zz2 = z2 * z;

    let wy2 = y2 * w;
    let wz2 = z2 * w;
    let wx2 = x2 * w;

    [
        [1.0 - yy2 - zz2, xy2 - wz2, xz2 + wy2, 0.0],
        [xy2 + wz2, 1.0 - xx2 - zz2, yz2 - wx2, 0.0],
        [xz2 - wy2, yz2 + wx2, 1.0 - xx2 - yy2, 0.0],
        [0.0, 0.0, 0.0, 1.0]
    ]

}

///
/// Builds `translation * rotation * scale` as a single row-major matrix
///
pub fn trs_to_matrix(
    translation: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
) -> Matrix4<f32> {
    let mut m = quaternion_to_matrix(rotation);

    for row in 0 .. 3 {
        for col in 0 .. 3 {
            m[row][col] *= scale[col];
        }
        m[row][3] = translation[row];
    }

    m
}
