//! Head pose recovery from sparse facial landmarks.
//!
//! Solves the Perspective-n-Point problem between a fixed generic 3D face
//! model and six observed 2D landmark projections, then decomposes the
//! resulting rotation into yaw/pitch/roll. No per-subject calibration: the
//! model geometry is a population-neutral constant.

use nalgebra::{Matrix3, Point2, Point3, Rotation3, SMatrix, SVector, Vector3, Vector6};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CAMERA_CENTER_FACTOR, FACE_MODEL_POINTS, GIMBAL_LOCK_EPSILON, PNP_CONVERGENCE_TOLERANCE,
    PNP_JACOBIAN_DELTA, PNP_MAX_ITERATIONS, PNP_MAX_STEP_HALVINGS, PNP_MIN_DEPTH,
    PNP_MIN_IMAGE_SPAN,
};
use crate::util::round_decimals;

const NUM_LANDMARKS: usize = 6;
const NUM_RESIDUALS: usize = NUM_LANDMARKS * 2;

type Residuals = SVector<f64, NUM_RESIDUALS>;
type Jacobian = SMatrix<f64, NUM_RESIDUALS, 6>;

/// The six 2D landmark projections used for pose recovery, in pixel
/// coordinates. Ordering matches the 3D face model: nose tip, chin, left eye
/// corner, right eye corner, left mouth corner, right mouth corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub nose_tip: [f64; 2],
    pub chin: [f64; 2],
    pub left_eye_corner: [f64; 2],
    pub right_eye_corner: [f64; 2],
    pub left_mouth_corner: [f64; 2],
    pub right_mouth_corner: [f64; 2],
}

impl FaceLandmarks {
    fn as_points(&self) -> [Point2<f64>; NUM_LANDMARKS] {
        [
            self.nose_tip,
            self.chin,
            self.left_eye_corner,
            self.right_eye_corner,
            self.left_mouth_corner,
            self.right_mouth_corner,
        ]
        .map(|[x, y]| Point2::new(x, y))
    }
}

/// Head rotation angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Rotation around the vertical axis
    pub yaw: f64,
    /// Rotation around the lateral axis
    pub pitch: f64,
    /// Rotation around the forward axis; exposed for diagnostics
    pub roll: f64,
}

/// Head pose estimator using an iterative `PnP` solve
pub struct HeadPoseSolver {
    model_points: [Point3<f64>; NUM_LANDMARKS],
    camera_matrix: Matrix3<f64>,
}

impl HeadPoseSolver {
    /// Create a solver for the given frame dimensions.
    ///
    /// The camera is approximated as an undistorted pinhole: focal length =
    /// frame width, principal point = frame center.
    #[must_use]
    pub fn new(frame_width: f64, frame_height: f64) -> Self {
        let focal_length = frame_width;
        let center = (
            frame_width / CAMERA_CENTER_FACTOR,
            frame_height / CAMERA_CENTER_FACTOR,
        );

        let camera_matrix = Matrix3::new(
            focal_length, 0.0, center.0,
            0.0, focal_length, center.1,
            0.0, 0.0, 1.0,
        );

        Self {
            model_points: FACE_MODEL_POINTS.map(|[x, y, z]| Point3::new(x, y, z)),
            camera_matrix,
        }
    }

    /// Estimate head pose from the six landmark projections.
    ///
    /// Returns `None` when the solve fails to converge or the landmark
    /// configuration is degenerate; angles are never fabricated.
    #[must_use]
    pub fn estimate(&self, landmarks: &FaceLandmarks) -> Option<HeadPose> {
        let image_points = landmarks.as_points();
        let pose = self.solve_pnp(&image_points)?;

        let rotation = Rotation3::new(Vector3::new(pose[0], pose[1], pose[2]));
        let (yaw, pitch, roll) = rotation_to_euler(rotation.matrix());

        Some(HeadPose {
            yaw: round_decimals(yaw.to_degrees(), 2),
            pitch: round_decimals(pitch.to_degrees(), 2),
            roll: round_decimals(roll.to_degrees(), 2),
        })
    }

    /// Gauss-Newton minimization of the reprojection error over
    /// [rotation vector, translation], with step halving to keep the
    /// residual norm monotonically decreasing
    fn solve_pnp(&self, image_points: &[Point2<f64>; NUM_LANDMARKS]) -> Option<Vector6<f64>> {
        let mut params = self.initial_guess(image_points)?;
        let mut error = self.reprojection_residuals(&params, image_points)?.norm();

        for _ in 0..PNP_MAX_ITERATIONS {
            let residuals = self.reprojection_residuals(&params, image_points)?;
            let jacobian = self.numeric_jacobian(&params, image_points)?;

            let normal = jacobian.transpose() * jacobian;
            let rhs = -(jacobian.transpose() * residuals);
            let mut step = normal.lu().solve(&rhs)?;

            // Halve overshooting steps; a step that cannot reduce the error
            // at all means the solve has stalled
            let mut improved = false;
            for _ in 0..PNP_MAX_STEP_HALVINGS {
                let candidate = params + step;
                if let Some(candidate_residuals) = self.reprojection_residuals(&candidate, image_points) {
                    let candidate_error = candidate_residuals.norm();
                    if candidate_error.is_finite() && candidate_error <= error {
                        params = candidate;
                        error = candidate_error;
                        improved = true;
                        break;
                    }
                }
                step /= 2.0;
            }
            if !improved {
                return None;
            }

            if !params.iter().all(|p| p.is_finite()) {
                return None;
            }
            if step.norm() < PNP_CONVERGENCE_TOLERANCE {
                return Some(params);
            }
        }

        None
    }

    /// Depth-seeded starting point: zero rotation, translation from the nose
    /// position and the nose-chin span
    fn initial_guess(&self, image_points: &[Point2<f64>; NUM_LANDMARKS]) -> Option<Vector6<f64>> {
        let image_span = (image_points[0] - image_points[1]).norm();
        if image_span < PNP_MIN_IMAGE_SPAN {
            return None;
        }
        let model_span = (self.model_points[0] - self.model_points[1]).norm();

        let focal = self.camera_matrix[(0, 0)];
        let depth = focal * model_span / image_span;

        let nose = image_points[0];
        let tx = (nose.x - self.camera_matrix[(0, 2)]) * depth / focal;
        let ty = (nose.y - self.camera_matrix[(1, 2)]) * depth / self.camera_matrix[(1, 1)];

        Some(Vector6::new(0.0, 0.0, 0.0, tx, ty, depth))
    }

    fn reprojection_residuals(
        &self,
        params: &Vector6<f64>,
        image_points: &[Point2<f64>; NUM_LANDMARKS],
    ) -> Option<Residuals> {
        let mut residuals = Residuals::zeros();
        for (i, (model, observed)) in self.model_points.iter().zip(image_points).enumerate() {
            let projected = self.project(params, model)?;
            residuals[2 * i] = projected.x - observed.x;
            residuals[2 * i + 1] = projected.y - observed.y;
        }
        Some(residuals)
    }

    fn numeric_jacobian(
        &self,
        params: &Vector6<f64>,
        image_points: &[Point2<f64>; NUM_LANDMARKS],
    ) -> Option<Jacobian> {
        let mut jacobian = Jacobian::zeros();
        for j in 0..6 {
            let mut forward = *params;
            let mut backward = *params;
            forward[j] += PNP_JACOBIAN_DELTA;
            backward[j] -= PNP_JACOBIAN_DELTA;

            let r_forward = self.reprojection_residuals(&forward, image_points)?;
            let r_backward = self.reprojection_residuals(&backward, image_points)?;
            jacobian.set_column(j, &((r_forward - r_backward) / (2.0 * PNP_JACOBIAN_DELTA)));
        }
        Some(jacobian)
    }

    /// Project one model point through the current pose and the camera matrix.
    /// Points at or behind the camera plane make the pose invalid.
    fn project(&self, params: &Vector6<f64>, model: &Point3<f64>) -> Option<Point2<f64>> {
        let rotation = Rotation3::new(Vector3::new(params[0], params[1], params[2]));
        let camera_point = rotation * model + Vector3::new(params[3], params[4], params[5]);

        if camera_point.z < PNP_MIN_DEPTH {
            return None;
        }

        let fx = self.camera_matrix[(0, 0)];
        let fy = self.camera_matrix[(1, 1)];
        let cx = self.camera_matrix[(0, 2)];
        let cy = self.camera_matrix[(1, 2)];

        Some(Point2::new(
            fx * camera_point.x / camera_point.z + cx,
            fy * camera_point.y / camera_point.z + cy,
        ))
    }
}

/// Decompose a rotation matrix into (yaw, pitch, roll) in radians.
///
/// Near the gimbal-lock singularity the alternate extraction is used and
/// roll is reported as zero.
fn rotation_to_euler(rotation: &Matrix3<f64>) -> (f64, f64, f64) {
    let sy = (rotation[(0, 0)].powi(2) + rotation[(1, 0)].powi(2)).sqrt();
    let yaw = (-rotation[(2, 0)]).atan2(sy);

    if sy < GIMBAL_LOCK_EPSILON {
        let pitch = (-rotation[(1, 2)]).atan2(rotation[(1, 1)]);
        (yaw, pitch, 0.0)
    } else {
        let pitch = rotation[(2, 1)].atan2(rotation[(2, 2)]);
        let roll = rotation[(1, 0)].atan2(rotation[(0, 0)]);
        (yaw, pitch, roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rotation_has_zero_euler_angles() {
        let identity = Matrix3::identity();
        let (yaw, pitch, roll) = rotation_to_euler(&identity);
        assert!(yaw.abs() < 1e-12);
        assert!(pitch.abs() < 1e-12);
        assert!(roll.abs() < 1e-12);
    }

    #[test]
    fn test_singular_rotation_reports_zero_roll() {
        // 90 degree yaw puts the extraction at the singularity
        let rotation = Rotation3::new(Vector3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0));
        let (yaw, _, roll) = rotation_to_euler(rotation.matrix());
        assert!((yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(roll, 0.0);
    }

    #[test]
    fn test_degenerate_landmarks_yield_none() {
        let solver = HeadPoseSolver::new(640.0, 480.0);
        let collapsed = FaceLandmarks {
            nose_tip: [320.0, 240.0],
            chin: [320.0, 240.0],
            left_eye_corner: [320.0, 240.0],
            right_eye_corner: [320.0, 240.0],
            left_mouth_corner: [320.0, 240.0],
            right_mouth_corner: [320.0, 240.0],
        };
        assert!(solver.estimate(&collapsed).is_none());
    }
}
