mod codec;
mod model;
mod patch;
mod render;

pub use codec::{decode_content, encode_content, validate_content};
pub use model::{
    Block, BlockBody, BlockKind, FeaturesContent, HeroContent, ImageContent, TextContent,
};
pub use patch::{BlockPatch, FeaturesPatch, HeroPatch, ImagePatch, PatchError, TextPatch};
pub use render::render;
