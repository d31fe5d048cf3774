use crate::graphics::Sealed;

pub trait PipelineType: Sealed {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Graphics;

impl Sealed for Graphics {}
impl PipelineType for Graphics {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Compute;

impl Sealed for Compute {}
impl PipelineType for Compute {}
