//! Lossless and lossy size reduction of existing PDFs

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::PdfError;
use crate::model::{CompressionLevel, CompressionReport};

/// Below this level images are left untouched
const IMAGE_RECOMPRESSION_THRESHOLD: u8 = 20;

/// Tuning derived from a compression level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionProfile {
    /// JPEG quality used for re-encoded images (30-95)
    pub jpeg_quality: u8,
    /// Linear downsampling factor applied to image dimensions (0.5-1.0)
    pub image_scale: f32,
    pub recompress_images: bool,
    /// Images are never scaled below this many pixels on either side
    pub min_image_dimension: u32,
}

impl CompressionProfile {
    pub fn for_level(level: CompressionLevel) -> Self {
        let level = level.value();
        let quality = (95.0 - level as f32 * 0.6).clamp(30.0, 95.0);
        Self {
            jpeg_quality: quality.round() as u8,
            image_scale: 1.0 - level as f32 / 100.0 * 0.5,
            recompress_images: level >= IMAGE_RECOMPRESSION_THRESHOLD,
            min_image_dimension: 64,
        }
    }
}

#[derive(Debug, Default)]
struct PassStats {
    duplicate_streams: usize,
    images_recompressed: usize,
    pruned_objects: usize,
}

/// Rewrites a PDF to be smaller while keeping its pages intact
pub struct PdfCompressor {
    profile: CompressionProfile,
}

impl PdfCompressor {
    pub fn new(level: CompressionLevel) -> Self {
        Self::with_profile(CompressionProfile::for_level(level))
    }

    pub fn with_profile(profile: CompressionProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &CompressionProfile {
        &self.profile
    }

    /// Compress `input`. The result is never larger than the input: when no
    /// saving is possible the original bytes are returned.
    pub fn compress(&self, input: &[u8]) -> Result<(Vec<u8>, CompressionReport), PdfError> {
        let mut doc = Document::load_mem(input).map_err(|e| PdfError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        let page_count = doc.get_pages().len();

        let mut stats = PassStats {
            duplicate_streams: dedupe_streams(&mut doc),
            ..PassStats::default()
        };
        if self.profile.recompress_images {
            stats.images_recompressed = recompress_images(&mut doc, &self.profile);
        }
        stats.pruned_objects = doc.prune_objects().len();
        doc.compress();

        let mut output = Vec::with_capacity(input.len());
        doc.save_to(&mut output)
            .map_err(|e| PdfError::Save(e.to_string()))?;

        let written = Document::load_mem(&output)
            .map_err(|e| PdfError::Structure(format!("rewritten PDF does not parse: {}", e)))?;
        if written.get_pages().len() != page_count {
            return Err(PdfError::Structure(format!(
                "page count changed from {} to {}",
                page_count,
                written.get_pages().len()
            )));
        }

        log::debug!(
            "Compression passes: {} duplicate streams, {} images re-encoded, {} objects pruned",
            stats.duplicate_streams,
            stats.images_recompressed,
            stats.pruned_objects
        );

        let output = if output.len() < input.len() {
            output
        } else {
            log::info!("PDF is already compact, keeping the original");
            input.to_vec()
        };
        let report = CompressionReport {
            original_size: input.len(),
            compressed_size: output.len(),
        };
        log::info!(
            "Compressed PDF from {} to {} bytes ({:.1}% smaller)",
            report.original_size,
            report.compressed_size,
            report.ratio()
        );
        Ok((output, report))
    }
}

fn name_of<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    match dict.get(key) {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        _ => None,
    }
}

fn integer_of(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match dict.get(key) {
        Ok(Object::Integer(value)) => Some(*value),
        _ => None,
    }
}

/// Cross-reference and object streams describe file layout, not content
fn is_structural(stream: &Stream) -> bool {
    matches!(name_of(&stream.dict, b"Type"), Some(b"XRef") | Some(b"ObjStm"))
}

/// Point every reference to a duplicate stream at the first identical one,
/// then drop the duplicates. Returns the number of streams removed.
fn dedupe_streams(doc: &mut Document) -> usize {
    let mut buckets: HashMap<u64, Vec<(ObjectId, String)>> = HashMap::new();
    let mut replacements: HashMap<ObjectId, ObjectId> = HashMap::new();

    for (id, object) in &doc.objects {
        let Object::Stream(stream) = object else {
            continue;
        };
        if is_structural(stream) {
            continue;
        }
        let signature = format!("{:?}", stream.dict);
        let mut hasher = DefaultHasher::new();
        signature.hash(&mut hasher);
        stream.content.hash(&mut hasher);

        let bucket = buckets.entry(hasher.finish()).or_default();
        let original = bucket
            .iter()
            .find(|(candidate, candidate_signature)| {
                *candidate_signature == signature
                    && matches!(
                        doc.objects.get(candidate),
                        Some(Object::Stream(other)) if other.content == stream.content
                    )
            })
            .map(|(candidate, _)| *candidate);
        match original {
            Some(original) => {
                replacements.insert(*id, original);
            }
            None => bucket.push((*id, signature)),
        }
    }

    if replacements.is_empty() {
        return 0;
    }
    for object in doc.objects.values_mut() {
        redirect_refs(object, &replacements);
    }
    for value in doc.trailer.iter_mut().map(|(_, value)| value) {
        redirect_refs(value, &replacements);
    }
    for duplicate in replacements.keys() {
        doc.objects.remove(duplicate);
    }
    replacements.len()
}

fn redirect_refs(object: &mut Object, replacements: &HashMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(target) = replacements.get(id) {
                *id = *target;
            }
        }
        Object::Array(items) => {
            for item in items {
                redirect_refs(item, replacements);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                redirect_refs(value, replacements);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                redirect_refs(value, replacements);
            }
        }
        _ => {}
    }
}

fn is_image(stream: &Stream) -> bool {
    matches!(name_of(&stream.dict, b"Subtype"), Some(b"Image"))
}

fn recompress_images(doc: &mut Document, profile: &CompressionProfile) -> usize {
    // Soft masks must keep their exact samples
    let masks: HashSet<ObjectId> = doc
        .objects
        .values()
        .filter_map(|object| match object {
            Object::Stream(stream) if is_image(stream) => Some(stream),
            _ => None,
        })
        .flat_map(|stream| [stream.dict.get(b"SMask"), stream.dict.get(b"Mask")])
        .filter_map(|value| value.and_then(Object::as_reference).ok())
        .collect();

    let image_ids: Vec<ObjectId> = doc
        .objects
        .iter()
        .filter_map(|(id, object)| match object {
            Object::Stream(stream) if is_image(stream) && !masks.contains(id) => Some(*id),
            _ => None,
        })
        .collect();

    let mut recompressed = 0;
    for id in image_ids {
        let Some(Object::Stream(stream)) = doc.objects.get_mut(&id) else {
            continue;
        };
        match reencode_image(stream, profile) {
            Ok(true) => recompressed += 1,
            Ok(false) => log::debug!("Image {:?} is already smaller than a re-encode", id),
            Err(reason) => log::debug!("Keeping image {:?} as is: {}", id, reason),
        }
    }
    recompressed
}

/// Downsample and JPEG-encode one image XObject in place.
/// Returns whether the stream was replaced.
fn reencode_image(stream: &mut Stream, profile: &CompressionProfile) -> Result<bool, String> {
    let (decoded, gray) = decode_image(stream)?;

    let (width, height) = (decoded.width(), decoded.height());
    let target_width = scaled_dimension(width, profile);
    let target_height = scaled_dimension(height, profile);
    let resized = if target_width < width || target_height < height {
        decoded.resize_exact(target_width, target_height, FilterType::Lanczos3)
    } else {
        decoded
    };

    let (encodable, color_space) = if gray {
        (DynamicImage::ImageLuma8(resized.to_luma8()), "DeviceGray")
    } else {
        (DynamicImage::ImageRgb8(resized.to_rgb8()), "DeviceRGB")
    };
    let mut jpeg = Vec::new();
    encodable
        .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, profile.jpeg_quality))
        .map_err(|e| format!("JPEG encoding failed: {}", e))?;

    if jpeg.len() >= stream.content.len() {
        return Ok(false);
    }

    let dict = &mut stream.dict;
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    dict.set("Width", Object::Integer(encodable.width() as i64));
    dict.set("Height", Object::Integer(encodable.height() as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.remove(b"DecodeParms");
    stream.set_content(jpeg);
    Ok(true)
}

fn scaled_dimension(pixels: u32, profile: &CompressionProfile) -> u32 {
    let scaled = (pixels as f32 * profile.image_scale).round() as u32;
    scaled.max(profile.min_image_dimension).min(pixels)
}

/// Decode an image XObject into pixels; the flag is true for grayscale
fn decode_image(stream: &Stream) -> Result<(DynamicImage, bool), String> {
    let dict = &stream.dict;
    if dict.has(b"SMask") || dict.has(b"Mask") {
        return Err("image carries a mask".into());
    }
    if matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true))) {
        return Err("stencil mask".into());
    }

    let gray = match name_of(dict, b"ColorSpace") {
        Some(b"DeviceRGB") => false,
        Some(b"DeviceGray") => true,
        _ => return Err("unsupported color space".into()),
    };
    let width = integer_of(dict, b"Width").filter(|w| *w > 0).ok_or("missing width")? as u32;
    let height = integer_of(dict, b"Height").filter(|h| *h > 0).ok_or("missing height")? as u32;
    if integer_of(dict, b"BitsPerComponent").unwrap_or(8) != 8 {
        return Err("only 8-bit components are handled".into());
    }

    let filter = match dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        Ok(Object::Array(filters)) if filters.len() == 1 => match &filters[0] {
            Object::Name(name) => Some(name.as_slice()),
            _ => return Err("malformed filter".into()),
        },
        Ok(_) => return Err("filter chain".into()),
        Err(_) => None,
    };

    let samples = match filter {
        Some(b"DCTDecode") => {
            let decoded = image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                .map_err(|e| format!("JPEG decoding failed: {}", e))?;
            return Ok((decoded, gray));
        }
        Some(b"FlateDecode") => {
            if dict.has(b"DecodeParms") {
                return Err("predictor-encoded samples".into());
            }
            stream
                .decompressed_content()
                .map_err(|e| format!("inflate failed: {}", e))?
        }
        None => stream.content.clone(),
        Some(_) => return Err("unsupported filter".into()),
    };

    let channels = if gray { 1 } else { 3 };
    let expected = width as usize * height as usize * channels;
    if samples.len() < expected {
        return Err(format!("expected {} sample bytes, got {}", expected, samples.len()));
    }
    let samples = samples[..expected].to_vec();
    let decoded = if gray {
        GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8)
    } else {
        RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8)
    };
    decoded
        .map(|image| (image, gray))
        .ok_or_else(|| "sample buffer does not match dimensions".to_string())
}
