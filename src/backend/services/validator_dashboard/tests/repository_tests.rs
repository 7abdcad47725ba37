use validator_dashboard::repositories::{
    FilePreferenceRepository, InMemoryPreferenceRepository, PreferenceRepository, Storage,
};

#[tokio::test]
async fn test_file_repository_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("preferences.json");
    let repo = FilePreferenceRepository::new(&path);

    assert_eq!(repo.get_preference(Storage::Currency).await?, None);

    repo.set_preference(Storage::Currency, "EUR".to_string()).await?;
    assert_eq!(
        repo.get_preference(Storage::Currency).await?,
        Some("EUR".to_string())
    );

    // A fresh handle reads what the first one wrote
    let reopened = FilePreferenceRepository::new(&path);
    assert_eq!(
        reopened.get_preference(Storage::Currency).await?,
        Some("EUR".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_file_repository_rejects_corrupt_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, b"not json")?;

    let repo = FilePreferenceRepository::new(&path);
    assert!(repo.get_preference(Storage::Currency).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_file_repository_write_recovers_corrupt_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, br#"{"currency":"EU"#)?;

    let repo = FilePreferenceRepository::new(&path);
    repo.set_preference(Storage::Currency, "EUR".to_string()).await?;
    assert_eq!(
        repo.get_preference(Storage::Currency).await?,
        Some("EUR".to_string())
    );

    // Only the store itself is left behind
    let entries: Vec<_> = std::fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_in_memory_repository() -> anyhow::Result<()> {
    let repo = InMemoryPreferenceRepository::new();
    assert_eq!(repo.get_preference(Storage::Currency).await?, None);

    repo.set_preference(Storage::Currency, "JPY".to_string()).await?;
    repo.set_preference(Storage::Currency, "CHF".to_string()).await?;
    assert_eq!(
        repo.get_preference(Storage::Currency).await?,
        Some("CHF".to_string())
    );

    Ok(())
}
