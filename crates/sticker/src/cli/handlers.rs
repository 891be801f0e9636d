use super::setup::{Commands, PackCommands};
use stickerapp::ads::AdProvider;
use stickerapp::api::{CmdResult, StickerApi};
use stickerapp::client::GenerationApi;
use stickerapp::clock::Clock;
use stickerapp::error::Result;
use stickerapp::store::backend::{FileBackend, MetadataBackend};

/// Route a parsed command to the API facade.
pub fn dispatch<B, G, P, C>(api: &mut StickerApi<B, G, P, C>, command: Commands) -> Result<CmdResult>
where
    B: MetadataBackend + FileBackend,
    G: GenerationApi,
    P: AdProvider,
    C: Clock,
{
    match command {
        Commands::Generate { prompt, image } => api.generate(&prompt, &image),
        Commands::Suggest { context } => api.suggest(context.as_deref()),
        Commands::Reward => api.reward(),
        Commands::Limit => api.limit(),
        Commands::Stickers => api.list_stickers(),
        Commands::Show { id } => api.show_sticker(&id),
        Commands::Import { paths, pack } => api.import(paths, pack.as_deref()),
        Commands::Export { id, dest } => api.export(&id, &dest),
        Commands::Add { sticker, pack } => api.add_to_pack(&sticker, &pack),
        Commands::Delete { id } => api.delete_sticker(&id),
        Commands::Packs => api.list_packs(),
        Commands::Pack { action } => match action {
            PackCommands::Show { id } => api.show_pack(&id),
            PackCommands::Create { name } => api.create_pack(&name),
            PackCommands::Delete { id } => api.delete_pack(&id),
        },
        Commands::Today => api.today_pack(),
        Commands::Doctor => api.doctor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::setup::Cli;
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use stickerapp::ads::{AdKind, AdSession, NoAds};
    use stickerapp::client::{GenerateMemeResponse, GenerateTextResponse};
    use stickerapp::clock::FixedClock;
    use stickerapp::daily_limit::DailyLimiter;
    use stickerapp::error::StickerError;
    use stickerapp::store::mem_backend::MemBackend;
    use stickerapp::store::sticker_store::StickerStore;
    use std::path::Path;

    struct OfflineApi;

    impl GenerationApi for OfflineApi {
        fn generate_meme(&self, _prompt: &str, _image: &Path) -> Result<GenerateMemeResponse> {
            Err(StickerError::Generation("offline".to_string()))
        }

        fn generate_text(&self, _context: &str) -> Result<GenerateTextResponse> {
            Ok(GenerateTextResponse {
                text: "¡Qué gato!".to_string(),
                success: Some(true),
            })
        }
    }

    type TestApi<'a> = StickerApi<&'a MemBackend, OfflineApi, NoAds, &'a FixedClock>;

    fn api<'a>(backend: &'a MemBackend, clock: &'a FixedClock) -> TestApi<'a> {
        StickerApi::new(
            StickerStore::with_clock(backend, backend, clock),
            DailyLimiter::with_clock(backend, clock),
            OfflineApi,
            AdSession::new(NoAds, AdKind::Interstitial),
            AdSession::new(NoAds, AdKind::Rewarded),
        )
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    fn run_args(api: &mut TestApi<'_>, args: &[&str]) -> Result<CmdResult> {
        let mut argv = vec!["sticker"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        dispatch(api, cli.command.unwrap_or(Commands::Stickers))
    }

    #[test]
    fn pack_create_then_list() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut api = api(&backend, &clock);

        run_args(&mut api, &["pack", "create", "Cats"]).unwrap();
        let listed = run_args(&mut api, &["packs"]).unwrap();
        assert_eq!(listed.packs[0].name, "Cats");
    }

    #[test]
    fn naked_invocation_lists_stickers() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut api = api(&backend, &clock);

        let result = run_args(&mut api, &[]).unwrap();
        assert!(result.stickers.is_empty());
        assert!(result.messages[0].content.contains("No stickers"));
    }

    #[test]
    fn suggest_returns_text() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut api = api(&backend, &clock);

        let result = run_args(&mut api, &["suggest", "cats"]).unwrap();
        assert_eq!(result.text.as_deref(), Some("¡Qué gato!"));
    }

    #[test]
    fn generate_errors_surface() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut api = api(&backend, &clock);
        let photo = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(photo.path(), b"jpeg").unwrap();

        let path = photo.path().to_str().unwrap();
        let err = run_args(&mut api, &["generate", "-p", "cat", "-i", path]).unwrap_err();
        assert!(matches!(err, StickerError::Generation(_)));
    }

    #[test]
    fn today_then_limit() {
        let backend = MemBackend::new();
        let clock = clock();
        let mut api = api(&backend, &clock);

        let today = run_args(&mut api, &["today"]).unwrap();
        assert_eq!(today.packs[0].name, "Pack 2024-06-01");
        let limit = run_args(&mut api, &["limit"]).unwrap();
        assert_eq!(limit.limit.unwrap().remaining, 5);
    }
}
