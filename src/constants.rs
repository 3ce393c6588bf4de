//! Constants used throughout the library

/// Kalman filter process-noise covariance for gaze smoothing
pub const DEFAULT_PROCESS_NOISE: f64 = 0.03;

/// Kalman filter measurement-noise covariance for gaze smoothing
pub const DEFAULT_MEASUREMENT_NOISE: f64 = 0.1;

/// Capacity of the rolling gaze-angle history
pub const DEFAULT_GAZE_HISTORY_SIZE: usize = 7;

/// Number of recent samples combined by the weighted average
pub const SMOOTHING_WINDOW: usize = 5;

/// Recency weights applied to the last [`SMOOTHING_WINDOW`] samples, oldest first
pub const SMOOTHING_WEIGHTS: [f64; SMOOTHING_WINDOW] = [0.10, 0.15, 0.20, 0.25, 0.30];

/// Compression applied to the displacement ratio before the arcsine projection,
/// keeping the input away from the asymptotic region near +/-1
pub const ARCSINE_COMPRESSION: f64 = 0.9;

/// Minimum sustained duration for a violation span to be reported, in seconds
pub const DEFAULT_MIN_EVENT_DURATION_SEC: f64 = 0.15;

/// Fixed eye-gaze horizontal threshold in degrees
pub const DEFAULT_EYE_HORIZONTAL_THRESHOLD: f64 = 8.0;

/// Fixed eye-gaze vertical threshold in degrees
pub const DEFAULT_EYE_VERTICAL_THRESHOLD: f64 = 6.0;

/// Fixed head yaw threshold in degrees
pub const DEFAULT_HEAD_YAW_THRESHOLD: f64 = 30.0;

/// Fixed head pitch threshold in degrees
pub const DEFAULT_HEAD_PITCH_THRESHOLD: f64 = 20.0;

/// Fixed head roll threshold in degrees (computed but not evaluated by detection)
pub const DEFAULT_HEAD_ROLL_THRESHOLD: f64 = 30.0;

/// Target sampling rate for frame extraction, frames per second
pub const DEFAULT_TARGET_FPS: u32 = 15;

/// Maximum frame dimension before the acquisition layer downscales, in pixels
pub const DEFAULT_MAX_FRAME_DIMENSION: u32 = 960;

/// Generic 3D face model used by the pose solver: nose tip, chin, left eye
/// corner, right eye corner, left mouth corner, right mouth corner, in a
/// neutral head-centered coordinate frame
pub const FACE_MODEL_POINTS: [[f64; 3]; 6] = [
    [0.0, 0.0, 0.0],
    [0.0, -3.3, -2.5],
    [-2.3, 1.65, -1.5],
    [2.3, 1.65, -1.5],
    [-1.5, -1.65, -1.5],
    [1.5, -1.65, -1.5],
];

/// Camera matrix principal-point divisor (principal point = frame center)
pub const CAMERA_CENTER_FACTOR: f64 = 2.0;

/// Singularity cutoff for the Euler-angle extraction
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-6;

/// Maximum Gauss-Newton iterations for the PnP solve
pub const PNP_MAX_ITERATIONS: usize = 100;

/// Step-norm convergence tolerance for the PnP solve
pub const PNP_CONVERGENCE_TOLERANCE: f64 = 1e-8;

/// Maximum step halvings per Gauss-Newton iteration
pub const PNP_MAX_STEP_HALVINGS: usize = 12;

/// Finite-difference step for the PnP Jacobian
pub const PNP_JACOBIAN_DELTA: f64 = 1e-6;

/// Minimum nose-chin image span accepted by the solver, in pixels
pub const PNP_MIN_IMAGE_SPAN: f64 = 1.0;

/// Minimum camera-space depth for a projected model point
pub const PNP_MIN_DEPTH: f64 = 1e-6;

/// Frame interval between progress log lines in the pipeline
pub const PROGRESS_LOG_INTERVAL: u64 = 100;
