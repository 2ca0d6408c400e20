//! Binding pipelines to a GPU context.
//!
//! The actual graphics API lives behind [`GpuContext`]; the binder only
//! decides what to upload and keeps LUT textures alive between frames.

use std::collections::HashMap;
use std::sync::Arc;

use dcolor_lut::{Lut1D, Lut3D};
use dcolor_pipeline::{ColorDescription, ColorPipeline, PipelineConfig};
use dcolor_primaries::RenderingIntent;
use tracing::{debug, warn};

use crate::error::BindResult;
use crate::uniforms::{LutBindings, ShaderUniforms};

/// The operations the binder needs from a graphics backend.
pub trait GpuContext {
    /// Backend texture handle.
    type Texture;

    /// Uploads the uniform block.
    fn upload_uniforms(&mut self, bytes: &[u8]) -> BindResult<()>;

    /// Creates a `size x 1` RGB float texture from a 1D LUT.
    fn create_lut1d_texture(&mut self, lut: &Lut1D) -> BindResult<Self::Texture>;

    /// Creates a 3D RGB float texture from a LUT.
    fn create_lut3d_texture(&mut self, lut: &Lut3D) -> BindResult<Self::Texture>;

    /// Binds a 1D LUT texture to `slot`.
    fn bind_lut1d(&mut self, slot: usize, texture: &Self::Texture);

    /// Binds the 3D LUT texture.
    fn bind_lut3d(&mut self, texture: &Self::Texture);
}

struct CachedLut<L, T> {
    // Holding the LUT keeps its address from being reused by another one.
    lut: Arc<L>,
    texture: T,
}

type CacheKey = usize;

fn cache_key<L>(lut: &Arc<L>) -> CacheKey {
    Arc::as_ptr(lut) as CacheKey
}

/// Uploads color pipelines to a [`GpuContext`].
///
/// Textures are cached by LUT identity: binding the same `Arc` again reuses
/// the texture. Call [`purge_unused`](Self::purge_unused) to drop textures
/// whose LUT is no longer referenced elsewhere.
pub struct ShaderBinder<G: GpuContext> {
    context: G,
    lut1d_cache: HashMap<CacheKey, CachedLut<Lut1D, G::Texture>>,
    lut3d_cache: HashMap<CacheKey, CachedLut<Lut3D, G::Texture>>,
}

impl<G: GpuContext> ShaderBinder<G> {
    /// Creates a binder around `context`.
    pub fn new(context: G) -> Self {
        Self {
            context,
            lut1d_cache: HashMap::new(),
            lut3d_cache: HashMap::new(),
        }
    }

    /// The wrapped context.
    pub fn context(&self) -> &G {
        &self.context
    }

    /// The wrapped context, mutably.
    pub fn context_mut(&mut self) -> &mut G {
        &mut self.context
    }

    /// Returns the context, dropping cached textures.
    pub fn into_inner(self) -> G {
        self.context
    }

    /// Number of cached textures.
    pub fn cached_textures(&self) -> usize {
        self.lut1d_cache.len() + self.lut3d_cache.len()
    }

    /// Builds the conversion from `src` to `dst` and binds it.
    pub fn bind_conversion(
        &mut self,
        src: &ColorDescription,
        dst: &ColorDescription,
        intent: RenderingIntent,
        config: &PipelineConfig,
    ) -> BindResult<ShaderUniforms> {
        let pipeline = ColorPipeline::create_with_config(src, dst, intent, config);
        self.bind(&pipeline)
    }

    /// Serializes `pipeline`, uploads it and binds its LUT textures.
    ///
    /// On failure nothing is uploaded and the error is logged; the caller
    /// decides how to fall back.
    pub fn bind(&mut self, pipeline: &ColorPipeline) -> BindResult<ShaderUniforms> {
        let uniforms = ShaderUniforms::from_pipeline(pipeline).inspect_err(|e| {
            warn!("failed to bind color pipeline: {}", e);
        })?;
        let luts = LutBindings::from_pipeline(pipeline);

        for (slot, lut) in luts.luts_1d.iter().enumerate() {
            let key = cache_key(lut);
            if !self.lut1d_cache.contains_key(&key) {
                let texture = self.context.create_lut1d_texture(lut)?;
                self.lut1d_cache.insert(
                    key,
                    CachedLut {
                        lut: Arc::clone(lut),
                        texture,
                    },
                );
            }
            if let Some(cached) = self.lut1d_cache.get(&key) {
                self.context.bind_lut1d(slot, &cached.texture);
            }
        }

        for lut in &luts.luts_3d {
            let key = cache_key(lut);
            if !self.lut3d_cache.contains_key(&key) {
                let texture = self.context.create_lut3d_texture(lut)?;
                self.lut3d_cache.insert(
                    key,
                    CachedLut {
                        lut: Arc::clone(lut),
                        texture,
                    },
                );
            }
            if let Some(cached) = self.lut3d_cache.get(&key) {
                self.context.bind_lut3d(&cached.texture);
            }
        }

        self.context.upload_uniforms(uniforms.as_bytes())?;
        debug!(ops = uniforms.op_count, textures = self.cached_textures(), "bound color pipeline");
        Ok(uniforms)
    }

    /// Drops textures whose LUT is only referenced by this cache.
    pub fn purge_unused(&mut self) {
        self.lut1d_cache.retain(|_, c| Arc::strong_count(&c.lut) > 1);
        self.lut3d_cache.retain(|_, c| Arc::strong_count(&c.lut) > 1);
    }
}
