//! Pipeline orchestration (§4.8): the state machine `Init → Downloaded →
//! Probed → Rasterized/Ingested → Colorized → Pyramided → Covered →
//! ManifestWritten → Published → Cleaned`, a single bounded worker pool
//! shared by the three parallel stages, and scratch-directory lifecycle.
//! No Go file maps onto this 1:1 — `processing.go::Processing` is one
//! long sequential function — so the stage split and pool-drain-between-
//! stages shape is grounded in `processing.go`'s own top-to-bottom phase
//! order, restructured around `rayon`'s scoped thread pool the way a
//! bounded-concurrency Rust service would.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::colorizer;
use crate::config::Config;
use crate::cover_builder;
use crate::data::{Asset, Page, PageGeometry, Swatch, SwatchType, Unit, ALPHA_CHANNEL, CMYK_CHANNEL_ORDER, RGB_CHANNEL_ORDER};
use crate::error::{DziError, Result};
use crate::http_fetcher::{self, HttpFetcher, ReqwestFetcher};
use crate::image_ingest;
use crate::ink_catalog::InkCatalog;
use crate::manifest::{build_manifest, ChannelV4, DziSize, Manifest, ManifestPage};
use crate::page_geometry;
use crate::pdf_meta::{NipdfMetaReader, PdfMeta};
use crate::presentation_converter::{self, LibreOfficeConverter, PresentationConverter};
use crate::publisher::{self, ObjectStoreCopier, S3Copier};
use crate::pyramidizer::{self, TilerConfig};
use crate::rasterizer::{GhostscriptRasterizer, RenderTarget, Rasterizer, RenderedPage};
use crate::text_extractor::{MutoolTextExtractor, TextExtractor};
use crate::xmp;

/// Bundles every capability adapter the coordinator drives. Each field
/// defaults to the concrete adapter described in §6; tests substitute
/// stubs wholesale via [`Coordinator::with_capabilities`].
pub struct Capabilities {
    pub fetcher: Box<dyn HttpFetcher + Send + Sync>,
    pub pdf_meta: Box<dyn PdfMeta + Send + Sync>,
    pub text_extractor: Box<dyn TextExtractor + Send + Sync>,
    pub rasterizer: Box<dyn Rasterizer + Send + Sync>,
    pub presentation_converter: Box<dyn PresentationConverter + Send + Sync>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            fetcher: Box::new(ReqwestFetcher),
            pdf_meta: Box::new(NipdfMetaReader),
            text_extractor: Box::new(MutoolTextExtractor::default()),
            rasterizer: Box::new(GhostscriptRasterizer::default()),
            presentation_converter: Box::new(LibreOfficeConverter::default()),
        }
    }
}

pub struct Coordinator {
    config: Config,
    capabilities: Capabilities,
    pool: rayon::ThreadPool,
}

/// Extracts a human-readable message from a `catch_unwind` payload; the
/// only place `Box<dyn Any>` is inspected in the crate.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked with a non-string payload".to_string()
    }
}

/// Runs `f` over every item on the shared pool, letting every task run
/// to completion (catching panics as errors) before failing the stage —
/// §5's "the run fails only after the pool drains, no cross-cancellation".
fn run_bounded<T, R>(pool: &rayon::ThreadPool, items: Vec<T>, f: impl Fn(T) -> Result<R> + Sync + Send) -> Result<Vec<R>>
where
    T: Send,
    R: Send,
{
    let results: Vec<Result<R>> = pool.install(move || {
        items
            .into_par_iter()
            .map(|item| {
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(item)))
                    .unwrap_or_else(|payload| Err(DziError::WorkerPanic(panic_message(payload))))
            })
            .collect()
    });

    let mut oks = Vec::with_capacity(results.len());
    let mut first_err = None;
    for r in results {
        match r {
            Ok(v) => oks.push(v),
            Err(e) if first_err.is_none() => first_err = Some(e),
            Err(_) => {}
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(oks),
    }
}

const PROCESS_CHANNEL_NAMES: [&str; 4] = ["cyan", "magenta", "yellow", "black"];

/// Orders discovered ink names the way §3 specifies: `CMYK_CHANNEL_ORDER`
/// (plus `Alpha`) for PDF input, `RGB_CHANNEL_ORDER` (plus `Alpha`) for
/// image input, then any remaining spots alphabetically (the emission
/// order the Rasterizer/ImageIngest reported is not preserved past
/// `BTreeMap<String, _>`; see DESIGN.md).
fn canonical_order_key(name: &str, mode: IngestMode) -> (u8, String) {
    let known: &[&str] = match mode {
        IngestMode::Pdf => &CMYK_CHANNEL_ORDER,
        IngestMode::Image => &RGB_CHANNEL_ORDER,
    };
    if let Some(i) = known.iter().position(|p| p.eq_ignore_ascii_case(name)) {
        return (i as u8, String::new());
    }
    if name.eq_ignore_ascii_case(ALPHA_CHANNEL) {
        return (known.len() as u8, String::new());
    }
    (known.len() as u8 + 1, name.to_ascii_lowercase())
}

/// Sorts a page's swatches per §3: the Final `"Color"` composite always
/// comes first, followed by the process/band channels in canonical
/// order, then any spots alphabetically.
fn order_swatches(swatches: &mut [Swatch], mode: IngestMode) {
    swatches.sort_by(|a, b| {
        let a_key = if a.is_final() { (0u8, (0u8, String::new())) } else { (1u8, canonical_order_key(&a.name, mode)) };
        let b_key = if b.is_final() { (0u8, (0u8, String::new())) } else { (1u8, canonical_order_key(&b.name, mode)) };
        a_key.cmp(&b_key)
    });
}

impl Coordinator {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_capabilities(config, Capabilities::default())
    }

    pub fn with_capabilities(config: Config, capabilities: Capabilities) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_cpu_count)
            .build()
            .map_err(|e| DziError::input(format!("failed to build worker pool: {e}")))?;
        Ok(Self { config, capabilities, pool })
    }

    /// Runs the full pipeline for one asset, returning the manifest
    /// written to the scratch root. Scratch cleanup always runs,
    /// success or failure, unless `DZI_DEBUG` is set (§4.8/§7).
    pub fn run(&mut self, url: &str, asset_id: u64) -> Result<Manifest> {
        let timestamp_start = chrono::Utc::now().to_rfc3339();
        let scratch_root = std::env::temp_dir().join(asset_id.to_string());
        std::fs::create_dir_all(&scratch_root).map_err(|e| DziError::io(scratch_root.clone(), e))?;

        let result = self.run_inner(url, asset_id, &scratch_root, &timestamp_start);

        if !self.config.debug {
            if let Err(e) = std::fs::remove_dir_all(&scratch_root) {
                log::warn!("failed to remove scratch tree {scratch_root:?}: {e}");
            }
        } else {
            log::info!("debug mode: scratch tree preserved at {scratch_root:?}");
        }

        result
    }

    fn run_inner(&mut self, url: &str, asset_id: u64, scratch_root: &Path, timestamp_start: &str) -> Result<Manifest> {
        log::info!("asset {asset_id}: downloading {url}");
        let filename = http_fetcher::filename_from_url(url);
        let mut extension = http_fetcher::extension_from_url(url);
        let basename = uuid::Uuid::new_v4().to_string();

        let downloaded_path = scratch_root.join(format!("source.{}", if extension.is_empty() { "bin" } else { &extension }));
        self.capabilities.fetcher.download(url, &downloaded_path)?;

        let asset = Asset {
            id: asset_id,
            source_url: url.to_string(),
            filename,
            basename: basename.clone(),
            extension: extension.clone(),
        };

        log::info!("asset {asset_id}: probing input");
        let mut input_path = downloaded_path;
        let mut config = self.config.clone();

        if presentation_converter::is_presentation_extension(&extension) {
            log::info!("asset {asset_id}: converting presentation input to PDF");
            let pdf_dir = scratch_root.join("converted");
            input_path = self.capabilities.presentation_converter.convert_to_pdf(&input_path, &pdf_dir)?;
            extension = "pdf".to_string();
            config = config.for_presentation_branch();
        }

        let (mode, mut pages) = if extension.eq_ignore_ascii_case("pdf") {
            self.probe_and_rasterize_pdf(&input_path, &asset, &config, scratch_root)?
        } else {
            self.probe_and_ingest_image(&input_path, &asset, &config, scratch_root)?
        };

        log::info!("asset {asset_id}: colorizing {} page(s)", pages.len());
        self.colorize_stage(&mut pages, &config, scratch_root)?;

        log::info!("asset {asset_id}: building DZI pyramids");
        self.pyramidize_stage(&mut pages, &config, scratch_root)?;

        log::info!("asset {asset_id}: building covers");
        self.cover_stage(&mut pages, &config)?;

        log::info!("asset {asset_id}: writing manifest");
        let manifest_pages = pages
            .into_iter()
            .map(|p| to_manifest_page(p, scratch_root))
            .collect();
        let timestamp_end = chrono::Utc::now().to_rfc3339();
        let mode_str = if mode == IngestMode::Pdf { "cmyk" } else { "srgb" };
        let manifest = build_manifest(&asset, manifest_pages, &config, mode_str, timestamp_start, &timestamp_end);

        log::info!("asset {asset_id}: publishing");
        let mut copier = S3Copier::new(&config);
        publisher::publish(&mut copier, scratch_root, &manifest, asset_id, &config)?;

        Ok(manifest)
    }

    fn probe_and_rasterize_pdf(
        &self,
        pdf_path: &Path,
        asset: &Asset,
        config: &Config,
        scratch_root: &Path,
    ) -> Result<(IngestMode, Vec<Page>)> {
        let doc_meta = self.capabilities.pdf_meta.read(pdf_path)?;
        let esko = xmp::parse_esko_shape(&doc_meta.xmp)?;
        let pdf_core = xmp::parse_pdf_core_shape(&doc_meta.xmp)?;
        let declared_spot_count = pdf_core
            .plate_names
            .iter()
            .filter(|n| !PROCESS_CHANNEL_NAMES.contains(&n.to_ascii_lowercase().as_str()))
            .count() as u32;

        let geometries: Vec<PageGeometry> = doc_meta
            .pages
            .iter()
            .map(|p| page_geometry::compute(p.point_width, p.point_height, p.rotation, config))
            .collect();

        let work: Vec<(u32, PageGeometry)> = doc_meta
            .pages
            .iter()
            .zip(geometries.iter())
            .map(|(p, g)| (p.page_number, *g))
            .collect();

        let pdf_path = pdf_path.to_path_buf();
        let extract_text = config.extract_text;
        let text_extractor = &self.capabilities.text_extractor;
        let rasterizer = &self.capabilities.rasterizer;

        let rendered: Vec<(u32, PageGeometry, RenderedPage, String)> = run_bounded(&self.pool, work, |(page_number, geometry)| {
            let output_dir = scratch_root.join("channels").join(format!("page_{page_number}"));
            let target = RenderTarget {
                page_number,
                dpi: geometry.effective_dpi,
                point_width: geometry.point_width,
                point_height: geometry.point_height,
                spot_count: declared_spot_count,
            };
            let basename = format!("{}_{page_number}", asset.basename);
            let rendered_page = rasterizer.render_page(&pdf_path, target, &output_dir, &basename, config)?;
            let text = if extract_text {
                text_extractor.extract(&pdf_path, page_number).unwrap_or_default()
            } else {
                String::new()
            };
            Ok((page_number, geometry, rendered_page, text))
        })?;

        let mut pages: Vec<Page> = rendered
            .into_iter()
            .map(|(page_number, geometry, rendered_page, text)| {
                // Each page gets its own catalog: the Esko/pdf-core shapes are
                // document-wide, but recovered spot CMYK tints (shared state
                // (a) of §5) come from that page's own Ghostscript stdout, so
                // there's no single-writer collision to guard against.
                let catalog = InkCatalog::new(esko.clone(), pdf_core.clone(), rendered_page.recovered_spots_rgb.clone());
                build_page_from_render(page_number, geometry, rendered_page, text, &catalog)
            })
            .collect::<Result<Vec<_>>>()?;
        pages.sort_by_key(|p| p.page_number);

        Ok((IngestMode::Pdf, pages))
    }

    fn probe_and_ingest_image(
        &self,
        image_path: &Path,
        asset: &Asset,
        config: &Config,
        scratch_root: &Path,
    ) -> Result<(IngestMode, Vec<Page>)> {
        let image = image::open(image_path)?;
        let output_dir = scratch_root.join("channels").join("page_1");
        let ingested = image_ingest::ingest_image(&image, &asset.basename, &output_dir, config.split_channels)?;

        let mut swatches = vec![Swatch::new_final(ingested.final_path)];
        for (name, path) in ingested.channel_paths {
            let rgb = image_ingest::band_default_rgb(&name)
                .ok_or_else(|| DziError::invariant(format!("no default RGB for image band {name:?}")))?;
            swatches.push(Swatch {
                name: name.clone(),
                ops_name: name,
                swatch_type: SwatchType::CmykComponent,
                rgb: crate::colormath::rgb_to_hex(rgb),
                needs_matte: true,
                working_filepath: Some(path),
                dzi_color_path: None,
                dzi_bw_path: None,
                lead_path: None,
                lead1000_path: None,
                cover_path: None,
                color_ranges: BTreeMap::new(),
                bw_ranges_path: None,
            });
        }
        order_swatches(&mut swatches, IngestMode::Image);

        let page = Page {
            page_number: 1,
            width: ingested.pixel_width as f64,
            height: ingested.pixel_height as f64,
            unit: Unit::Px,
            effective_dpi: 1,
            rotation: 0,
            text_content: String::new(),
            swatches,
        };

        Ok((IngestMode::Image, vec![page]))
    }

    fn colorize_stage(&self, pages: &mut [Page], config: &Config, scratch_root: &Path) -> Result<()> {
        let work: Vec<(u32, usize, Swatch)> = pages
            .iter()
            .flat_map(|p| p.swatches.iter().enumerate().map(move |(i, s)| (p.page_number, i, s.clone())))
            .collect();

        let copy_channels = config.copy_channels;
        let results = run_bounded(&self.pool, work, |(page_number, idx, swatch)| {
            let source = swatch
                .working_filepath
                .clone()
                .ok_or_else(|| DziError::invariant(format!("swatch {:?} has no working filepath", swatch.name)))?;

            if copy_channels {
                let raw_dest = scratch_root
                    .join("channels_raw")
                    .join(format!("page_{page_number}"))
                    .join(source.file_name().expect("working filepath must have a file name"));
                if let Some(parent) = raw_dest.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| DziError::io(parent.to_path_buf(), e))?;
                }
                std::fs::copy(&source, &raw_dest).map_err(|e| DziError::io(source.clone(), e))?;
            }

            let bw_dest = scratch_root
                .join("channels_bw")
                .join(format!("page_{page_number}"))
                .join(format!("{}.tiff", swatch.ops_name));
            let color_dest = scratch_root
                .join("channels")
                .join(format!("page_{page_number}"))
                .join(format!("{}.png", swatch.ops_name));

            let new_path = colorizer::colorize_swatch(&source, swatch.needs_matte, &swatch.rgb, &bw_dest, &color_dest)?;
            Ok((page_number, idx, new_path, swatch.needs_matte))
        })?;

        for (page_number, idx, new_path, needs_matte) in results {
            let page = pages
                .iter_mut()
                .find(|p| p.page_number == page_number)
                .expect("page must exist for its own swatch");
            if let Some(path) = new_path {
                page.swatches[idx].working_filepath = Some(path);
            }
            let _ = needs_matte;
        }
        Ok(())
    }

    fn pyramidize_stage(&self, pages: &mut [Page], config: &Config, scratch_root: &Path) -> Result<()> {
        let tiler = TilerConfig {
            tile_size: config.tile_size,
            overlap: config.overlap,
            format: config.tile_format.clone(),
        };

        let work: Vec<(u32, usize, Swatch)> = pages
            .iter()
            .flat_map(|p| p.swatches.iter().enumerate().map(move |(i, s)| (p.page_number, i, s.clone())))
            .collect();

        let results = run_bounded(&self.pool, work, |(page_number, idx, swatch)| {
            let color_zip = scratch_root.join("dzi").join(format!("page_{page_number}")).join(format!("{}.zip", swatch.ops_name));
            let color_source_path = materialize_color_source(&swatch, &config.icc_profile_path)?;
            let color_image = image::open(&color_source_path)?;
            std::fs::create_dir_all(color_zip.parent().expect("zip path has a parent"))
                .map_err(|e| DziError::io(color_zip.clone(), e))?;
            pyramidizer::build_pyramid_zip(&color_image, &swatch.ops_name, &tiler, &color_zip)?;
            let color_ranges = pyramidizer::build_tile_index(&color_zip)?;

            let bw_path = scratch_root
                .join("channels_bw")
                .join(format!("page_{page_number}"))
                .join(format!("{}.tiff", swatch.ops_name));
            let bw_result = if swatch.is_final() {
                None
            } else {
                let bw_zip = scratch_root.join("dzi_bw").join(format!("page_{page_number}")).join(format!("{}.zip", swatch.ops_name));
                let bw_image = image::open(&bw_path)?;
                std::fs::create_dir_all(bw_zip.parent().expect("zip path has a parent"))
                    .map_err(|e| DziError::io(bw_zip.clone(), e))?;
                pyramidizer::build_pyramid_zip(&bw_image, &swatch.ops_name, &tiler, &bw_zip)?;
                let bw_ranges = pyramidizer::build_tile_index(&bw_zip)?;
                let bw_ranges_path = publisher::spill_bw_ranges(scratch_root, page_number, &swatch.ops_name, &bw_ranges)?;
                Some((bw_zip, bw_ranges_path))
            };

            Ok((page_number, idx, color_source_path, color_zip, color_ranges, bw_result))
        })?;

        for (page_number, idx, color_source_path, color_zip, color_ranges, bw_result) in results {
            let page = pages
                .iter_mut()
                .find(|p| p.page_number == page_number)
                .expect("page must exist for its own swatch");
            let swatch = &mut page.swatches[idx];
            swatch.working_filepath = Some(color_source_path);
            swatch.dzi_color_path = Some(color_zip);
            swatch.color_ranges = color_ranges;
            if let Some((bw_zip, bw_ranges_path)) = bw_result {
                swatch.dzi_bw_path = Some(bw_zip);
                swatch.bw_ranges_path = Some(bw_ranges_path);
            }
        }
        Ok(())
    }

    fn cover_stage(&self, pages: &mut [Page], config: &Config) -> Result<()> {
        let work: Vec<(u32, usize, Swatch)> = pages
            .iter()
            .flat_map(|p| p.swatches.iter().enumerate().map(move |(i, s)| (p.page_number, i, s.clone())))
            .collect();

        let results = run_bounded(&self.pool, work, |(page_number, idx, swatch)| {
            let zip_path = swatch
                .dzi_color_path
                .clone()
                .ok_or_else(|| DziError::invariant(format!("swatch {:?} has no color DZI yet", swatch.name)))?;
            let scratch_root = zip_path
                .parent()
                .and_then(|p| p.parent())
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."));
            let lead_dest = scratch_root
                .join("leads")
                .join(format!("page_{page_number}"))
                .join(format!("{}.png", swatch.ops_name));
            let lead1000_dest = scratch_root
                .join("leads1000")
                .join(format!("page_{page_number}"))
                .join(format!("{}.png", swatch.ops_name));
            let cover_dest = scratch_root
                .join("covers")
                .join(format!("page_{page_number}"))
                .join(format!("{}.png", swatch.ops_name));

            cover_builder::build_cover(&zip_path, config.tile_size, config.cover_height, &lead_dest, &lead1000_dest, &cover_dest)?;
            Ok((page_number, idx, lead_dest, lead1000_dest, cover_dest))
        })?;

        for (page_number, idx, lead_dest, lead1000_dest, cover_dest) in results {
            let page = pages
                .iter_mut()
                .find(|p| p.page_number == page_number)
                .expect("page must exist for its own swatch");
            let swatch = &mut page.swatches[idx];
            swatch.lead_path = Some(lead_dest);
            swatch.lead1000_path = Some(lead1000_dest);
            swatch.cover_path = Some(cover_dest);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IngestMode {
    Pdf,
    Image,
}

fn build_page_from_render(
    page_number: u32,
    geometry: PageGeometry,
    rendered: RenderedPage,
    text_content: String,
    catalog: &InkCatalog,
) -> Result<Page> {
    let mut swatches = Vec::with_capacity(rendered.ink_files.len());
    for (name, path) in rendered.ink_files {
        if name == "Color" {
            swatches.push(Swatch::new_final(path));
            continue;
        }
        let resolved = catalog.resolve(&name)?;
        swatches.push(Swatch {
            name: name.clone(),
            ops_name: name,
            swatch_type: resolved.swatch_type,
            rgb: resolved.hex,
            needs_matte: true,
            working_filepath: Some(path),
            dzi_color_path: None,
            dzi_bw_path: None,
            lead_path: None,
            lead1000_path: None,
            cover_path: None,
            color_ranges: BTreeMap::new(),
            bw_ranges_path: None,
        });
    }
    if !swatches.iter().any(Swatch::is_final) {
        swatches.push(compose_fallback_final_swatch(page_number, &swatches)?);
    }

    order_swatches(&mut swatches, IngestMode::Pdf);

    const IN_TO_MM: f64 = 25.4;
    Ok(Page {
        page_number,
        width: geometry.inch_width * IN_TO_MM,
        height: geometry.inch_height * IN_TO_MM,
        unit: Unit::Mm,
        effective_dpi: geometry.effective_dpi,
        rotation: geometry.rotation,
        text_content,
        swatches,
    })
}

/// §9 supplemented feature 2: if Ghostscript's composite render is
/// missing from a page's output folder, synthesize "Color" by
/// multiply-blending every separation's screen-matte together instead
/// of failing the page outright.
fn compose_fallback_final_swatch(page_number: u32, swatches: &[Swatch]) -> Result<Swatch> {
    let mut separations = Vec::with_capacity(swatches.len());
    for swatch in swatches {
        let path = swatch
            .working_filepath
            .as_ref()
            .ok_or_else(|| DziError::invariant(format!("swatch {:?} has no working filepath", swatch.name)))?;
        let gray = image::open(path)?.into_luma8();
        let rgb = crate::colormath::hex_to_rgb(&swatch.rgb)
            .ok_or_else(|| DziError::invariant(format!("swatch {:?} has invalid RGB {:?}", swatch.name, swatch.rgb)))?;
        separations.push((gray, rgb));
    }

    let composed = image_ingest::compose_from_separations(&separations)
        .ok_or_else(|| DziError::invariant(format!("page {page_number} has no separations to compose a Color fallback from")))?;

    let dest = swatches[0]
        .working_filepath
        .as_ref()
        .expect("checked above")
        .with_file_name(format!("page_{page_number}_composed.jpg"));
    let mut out = std::fs::File::create(&dest).map_err(|e| DziError::io(dest.clone(), e))?;
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90);
    image::DynamicImage::ImageRgb8(composed).write_with_encoder(encoder)?;

    Ok(Swatch::new_final(dest))
}

/// For the Final composite, a TIFF working file is converted to a
/// quality-95 JPEG before tiling (§4.5); anything else (a matte PNG, or
/// an already-JPEG composite) tiles as-is.
fn materialize_color_source(swatch: &Swatch, _icc_profile_path: &str) -> Result<PathBuf> {
    let path = swatch
        .working_filepath
        .clone()
        .ok_or_else(|| DziError::invariant(format!("swatch {:?} has no working filepath", swatch.name)))?;

    let is_tiff = matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
        Some(ext) if ext == "tiff" || ext == "tif"
    );
    if !is_tiff {
        return Ok(path);
    }

    let jpeg_path = path.with_extension("jpg");
    let image = image::open(&path)?;
    let mut out = std::fs::File::create(&jpeg_path).map_err(|e| DziError::io(jpeg_path.clone(), e))?;
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 95);
    image.write_with_encoder(encoder)?;
    std::fs::remove_file(&path).map_err(|e| DziError::io(path.clone(), e))?;
    Ok(jpeg_path)
}

fn to_manifest_page(page: Page, scratch_root: &Path) -> ManifestPage {
    let channels = page.swatches.iter().map(|s| s.name.clone()).collect();
    let channels_v4 = page
        .swatches
        .iter()
        .map(|s| ChannelV4 {
            name: s.name.clone(),
            dzi_color_path: s.dzi_color_path.as_ref().map(|p| crate::manifest::relative_to_scratch(scratch_root, p)),
            dzi_bw_path: s.dzi_bw_path.as_ref().map(|p| crate::manifest::relative_to_scratch(scratch_root, p)),
            lead_path: s.lead_path.as_ref().map(|p| crate::manifest::relative_to_scratch(scratch_root, p)),
            lead1000_path: s.lead1000_path.as_ref().map(|p| crate::manifest::relative_to_scratch(scratch_root, p)),
            cover_path: s.cover_path.as_ref().map(|p| crate::manifest::relative_to_scratch(scratch_root, p)),
            color_ranges: s.color_ranges.clone(),
            bw_ranges_path: s.bw_ranges_path.as_ref().map(|p| crate::manifest::relative_to_scratch(scratch_root, p)),
        })
        .collect();

    ManifestPage {
        page_num: page.page_number,
        size: DziSize {
            width: page.width,
            height: page.height,
            units: page.unit.as_str().to_string(),
            dpi: page.effective_dpi,
        },
        text_content: page.text_content,
        channels,
        channels_v4,
    }
}

#[cfg(test)]
mod tests;
