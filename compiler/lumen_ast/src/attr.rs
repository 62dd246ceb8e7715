//! Attributes.

use std::fmt;

use lumen_diagnostic::DiagnosticControl;
use lumen_ir::Span;

use crate::NodeId;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PipelineStage {
    Vertex,
    Fragment,
    Compute,
}

impl PipelineStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Vertex => "vertex",
            PipelineStage::Fragment => "fragment",
            PipelineStage::Compute => "compute",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline builtin values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    Position,
    VertexIndex,
    InstanceIndex,
    FrontFacing,
    FragDepth,
    SampleIndex,
    LocalInvocationId,
    LocalInvocationIndex,
    GlobalInvocationId,
    WorkgroupId,
    NumWorkgroups,
}

impl Builtin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Builtin::Position => "position",
            Builtin::VertexIndex => "vertex_index",
            Builtin::InstanceIndex => "instance_index",
            Builtin::FrontFacing => "front_facing",
            Builtin::FragDepth => "frag_depth",
            Builtin::SampleIndex => "sample_index",
            Builtin::LocalInvocationId => "local_invocation_id",
            Builtin::LocalInvocationIndex => "local_invocation_index",
            Builtin::GlobalInvocationId => "global_invocation_id",
            Builtin::WorkgroupId => "workgroup_id",
            Builtin::NumWorkgroups => "num_workgroups",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AttrKind {
    Stage(PipelineStage),
    WorkgroupSize(u32, u32, u32),
    Location(u32),
    Builtin(Builtin),
    Group(u32),
    Binding(u32),
    Diagnostic(DiagnosticControl),
}

impl AttrKind {
    pub const fn name(&self) -> &'static str {
        match self {
            AttrKind::Stage(stage) => stage.as_str(),
            AttrKind::WorkgroupSize(..) => "workgroup_size",
            AttrKind::Location(_) => "location",
            AttrKind::Builtin(_) => "builtin",
            AttrKind::Group(_) => "group",
            AttrKind::Binding(_) => "binding",
            AttrKind::Diagnostic(_) => "diagnostic",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Attribute {
    pub id: NodeId,
    pub kind: AttrKind,
    pub span: Span,
}
