/// Stencil state types
///
/// Comparison semantics follow the GL convention: a test with function `F`,
/// reference `r`, and read mask `m` passes when `(r & m) F (stored & m)`.

/// Polygon face(s) a stencil state applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilFace {
    Front,
    Back,
    FrontAndBack,
}

impl StencilFace {
    /// Returns true if the state applies to front-facing polygons
    pub fn includes_front(&self) -> bool {
        matches!(self, StencilFace::Front | StencilFace::FrontAndBack)
    }

    /// Returns true if the state applies to back-facing polygons
    pub fn includes_back(&self) -> bool {
        matches!(self, StencilFace::Back | StencilFace::FrontAndBack)
    }
}

/// Action applied to the stored stencil value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    /// Leave the stored value unchanged
    Keep,
    /// Set the stored value to zero
    Zero,
    /// Set the stored value to the reference value
    Replace,
    /// Increment, clamping at the maximum
    Increment,
    /// Decrement, clamping at zero
    Decrement,
}

/// Stencil actions for the three test outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilOps {
    /// Stencil test failed
    pub stencil_fail: StencilOp,
    /// Stencil test passed, depth test failed
    pub depth_fail: StencilOp,
    /// Both tests passed
    pub depth_pass: StencilOp,
}

impl StencilOps {
    /// Keep on failure, apply `op` when both tests pass
    pub fn on_pass(op: StencilOp) -> Self {
        Self {
            stencil_fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            depth_pass: op,
        }
    }

    /// Never modify the stencil buffer
    pub fn keep() -> Self {
        Self::on_pass(StencilOp::Keep)
    }
}

/// Comparison function for stencil tests and shadow-map sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    Never,
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
    NotEqual,
    Always,
}

impl CompareFunction {
    /// Evaluate `lhs F rhs`
    pub fn compare(&self, lhs: u32, rhs: u32) -> bool {
        match self {
            CompareFunction::Never => false,
            CompareFunction::Less => lhs < rhs,
            CompareFunction::LessEqual => lhs <= rhs,
            CompareFunction::Equal => lhs == rhs,
            CompareFunction::GreaterEqual => lhs >= rhs,
            CompareFunction::Greater => lhs > rhs,
            CompareFunction::NotEqual => lhs != rhs,
            CompareFunction::Always => true,
        }
    }
}
