//! The create flow: turn a photo and a prompt into a stored sticker.
//!
//! 1. Reject a blank prompt or a missing photo (no credit is spent).
//! 2. Check and consume one generation from the daily limit.
//! 3. Ask the backend for the sticker.
//! 4. Save it into today's pack.
//! 5. Show an interstitial, best effort.
//!
//! A consumed generation is not given back when the backend fails.

use crate::ads::{AdProvider, AdSession};
use crate::client::GenerationApi;
use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::daily_limit::DailyLimiter;
use crate::error::{Result, StickerError};
use crate::store::backend::{FileBackend, MetadataBackend};
use crate::store::sticker_store::StickerStore;
use std::path::Path;
use tracing::{info, warn};

pub fn run<M, F, C, L, K, G, P>(
    store: &mut StickerStore<M, F, C>,
    limiter: &mut DailyLimiter<L, K>,
    api: &G,
    interstitial: &mut AdSession<P>,
    prompt: &str,
    image_path: &Path,
) -> Result<CmdResult>
where
    M: MetadataBackend,
    F: FileBackend,
    C: Clock,
    L: MetadataBackend,
    K: Clock,
    G: GenerationApi,
    P: AdProvider,
{
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(StickerError::InvalidInput(
            "describe the sticker you want".to_string(),
        ));
    }
    if !image_path.is_file() {
        return Err(StickerError::InvalidInput(format!(
            "image not found: {}",
            image_path.display()
        )));
    }

    if !limiter.can_use()? || !limiter.consume()? {
        return Err(StickerError::LimitReached {
            limit: limiter.limit(),
        });
    }

    let response = api.generate_meme(prompt, image_path)?;
    if !response.success {
        warn!(message = ?response.message, "backend reported a failed generation");
        return Err(StickerError::Generation(
            response
                .message
                .unwrap_or_else(|| "the backend could not generate the sticker".to_string()),
        ));
    }
    let image = response
        .image_base64
        .filter(|data| !data.trim().is_empty())
        .ok_or_else(|| StickerError::Generation("the backend sent no image".to_string()))?;

    let pack = store.get_or_create_today_pack()?;
    let sticker = store.save_sticker(&image, Some(&pack.id))?;
    let pack = store.get_pack(&pack.id)?;
    info!(sticker_id = %sticker.id, pack_id = %pack.id, "generated sticker");

    let outcome = interstitial.show_and_wait();

    let mut result = CmdResult::default()
        .with_stickers(vec![sticker])
        .with_packs(vec![pack.clone()])
        .with_limit(limiter.status()?);
    result.ad = Some(outcome);
    result.add_message(CmdMessage::success(format!(
        "Sticker saved to \"{}\"",
        pack.name
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::{AdEvent, AdKind, NoAds};
    use crate::client::{GenerateMemeResponse, GenerateTextResponse};
    use crate::commands::test_support::{clock, encoded, store, IMAGE};
    use crate::store::mem_backend::MemBackend;
    use std::cell::Cell;
    use std::sync::mpsc::Sender;

    struct FakeApi {
        response: GenerateMemeResponse,
        calls: Cell<usize>,
    }

    impl FakeApi {
        fn ok() -> Self {
            Self::with(GenerateMemeResponse {
                success: true,
                image_base64: Some(encoded()),
                message: None,
            })
        }

        fn with(response: GenerateMemeResponse) -> Self {
            Self {
                response,
                calls: Cell::new(0),
            }
        }
    }

    impl GenerationApi for FakeApi {
        fn generate_meme(&self, _prompt: &str, _image: &Path) -> Result<GenerateMemeResponse> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.response.clone())
        }

        fn generate_text(&self, _context: &str) -> Result<GenerateTextResponse> {
            unreachable!("not used by generate")
        }
    }

    struct InstantAd;

    impl AdProvider for InstantAd {
        fn load(&self, _kind: AdKind, events: Sender<AdEvent>) -> Result<()> {
            events.send(AdEvent::Loaded).unwrap();
            Ok(())
        }

        fn show(&self, _kind: AdKind, events: Sender<AdEvent>) -> Result<()> {
            events.send(AdEvent::Closed).unwrap();
            Ok(())
        }
    }

    fn photo() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"jpeg").unwrap();
        file
    }

    #[test]
    fn generate_saves_into_todays_pack() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(InstantAd, AdKind::Interstitial);
        let photo = photo();

        let result = run(
            &mut store,
            &mut limiter,
            &FakeApi::ok(),
            &mut ads,
            "a happy cat",
            photo.path(),
        )
        .unwrap();

        let sticker = &result.stickers[0];
        let pack = &result.packs[0];
        assert_eq!(pack.name, "Pack 2024-03-09");
        assert_eq!(pack.sticker_ids, vec![sticker.id.clone()]);
        assert_eq!(sticker.pack_id.as_deref(), Some(pack.id.as_str()));
        assert_eq!(store.read_sticker_image(&sticker.id).unwrap(), IMAGE);
        assert_eq!(result.limit.unwrap().remaining, 4);
        assert!(result.ad.unwrap().shown);
    }

    #[test]
    fn generate_twice_reuses_the_pack() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);
        let photo = photo();
        let api = FakeApi::ok();

        run(&mut store, &mut limiter, &api, &mut ads, "one", photo.path()).unwrap();
        let second = run(&mut store, &mut limiter, &api, &mut ads, "two", photo.path()).unwrap();

        assert_eq!(store.get_packs().unwrap().len(), 1);
        assert_eq!(second.packs[0].sticker_ids.len(), 2);
    }

    #[test]
    fn generate_without_quota_does_not_call_backend() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock).with_limit(1);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);
        let photo = photo();
        let api = FakeApi::ok();

        run(&mut store, &mut limiter, &api, &mut ads, "one", photo.path()).unwrap();
        let err = run(&mut store, &mut limiter, &api, &mut ads, "two", photo.path()).unwrap_err();

        assert!(matches!(err, StickerError::LimitReached { limit: 1 }));
        assert_eq!(api.calls.get(), 1);
    }

    #[test]
    fn blank_prompt_spends_nothing() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);
        let photo = photo();

        let err = run(&mut store, &mut limiter, &FakeApi::ok(), &mut ads, "  ", photo.path())
            .unwrap_err();
        assert!(matches!(err, StickerError::InvalidInput(_)));
        assert_eq!(limiter.remaining().unwrap(), 5);
    }

    #[test]
    fn missing_photo_spends_nothing() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);

        let err = run(
            &mut store,
            &mut limiter,
            &FakeApi::ok(),
            &mut ads,
            "cat",
            Path::new("/no/such/photo.jpg"),
        )
        .unwrap_err();
        assert!(matches!(err, StickerError::InvalidInput(_)));
        assert_eq!(limiter.remaining().unwrap(), 5);
    }

    #[test]
    fn failed_generation_keeps_the_credit_spent() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);
        let photo = photo();
        let api = FakeApi::with(GenerateMemeResponse {
            success: false,
            image_base64: None,
            message: Some("content filtered".to_string()),
        });

        let err = run(&mut store, &mut limiter, &api, &mut ads, "cat", photo.path()).unwrap_err();

        match err {
            StickerError::Generation(message) => assert_eq!(message, "content filtered"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(limiter.remaining().unwrap(), 4);
        assert!(store.get_packs().unwrap().is_empty());
    }

    #[test]
    fn success_without_image_is_a_failure() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);
        let photo = photo();
        let api = FakeApi::with(GenerateMemeResponse {
            success: true,
            image_base64: Some(String::new()),
            message: None,
        });

        let err = run(&mut store, &mut limiter, &api, &mut ads, "cat", photo.path()).unwrap_err();
        assert!(matches!(err, StickerError::Generation(_)));
        assert!(store.get_stickers().unwrap().is_empty());
    }

    #[test]
    fn missing_ads_do_not_fail_generation() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut store = store(&backend, &clock);
        let mut limiter = DailyLimiter::with_clock(&backend, &clock);
        let mut ads = AdSession::new(NoAds, AdKind::Interstitial);
        let photo = photo();

        let result = run(
            &mut store,
            &mut limiter,
            &FakeApi::ok(),
            &mut ads,
            "cat",
            photo.path(),
        )
        .unwrap();
        assert!(!result.ad.unwrap().shown);
        assert_eq!(result.stickers.len(), 1);
    }
}
