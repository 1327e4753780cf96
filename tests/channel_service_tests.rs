//! Integration tests for ChannelService and the inspect snapshot.

use anyhow::Result;
use campaigns::error::{ErrorKind, ServiceError};
use campaigns::repositories::{ChannelRepository, ChannelUpdate};
use campaigns::services::{CampaignService, ChannelService, InspectService};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{new_campaign, setup_test_db_arc};

#[tokio::test]
async fn create_defaults_type_and_trims_name() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let service = ChannelService::new(db.clone());

    let id = service.create_channel("  Newsletter ", None).await?;
    let channel = service.get_channel(id).await?.expect("channel exists");
    assert_eq!(channel.name, "Newsletter");
    assert_eq!(channel.channel_type, "Other");

    let found = ChannelRepository::new(db).get_by_name("Newsletter").await?;
    assert_eq!(found.map(|c| c.channel_id), Some(id));
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let service = ChannelService::new(db);

    service.create_channel("Google Ads", Some("Search")).await?;
    let err = service
        .create_channel("Google Ads", Some("Display"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.to_string().contains("Google Ads"));

    let other = service.create_channel("Bing Ads", None).await?;
    let err = service
        .update_channel(
            other,
            ChannelUpdate {
                name: Some("Google Ads".to_string()),
                channel_type: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn update_channel_partial_and_empty() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let service = ChannelService::new(db);
    let id = service.create_channel("Meta", Some("Social")).await?;

    assert_eq!(service.update_channel(id, ChannelUpdate::default()).await?, 0);

    let rows = service
        .update_channel(
            id,
            ChannelUpdate {
                name: None,
                channel_type: Some("Paid Social".to_string()),
            },
        )
        .await?;
    assert_eq!(rows, 1);

    let channel = service.get_channel(id).await?.expect("channel exists");
    assert_eq!(channel.name, "Meta");
    assert_eq!(channel.channel_type, "Paid Social");

    let blank = service
        .update_channel(
            id,
            ChannelUpdate {
                name: Some("  ".to_string()),
                channel_type: None,
            },
        )
        .await;
    assert!(matches!(blank, Err(ServiceError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn channel_safe_delete_mirrors_campaigns() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let campaigns = CampaignService::new(db.clone());
    let channels = ChannelService::new(db);

    let channel_id = channels.create_channel("Search", None).await?;
    for name in ["A", "B", "C"] {
        let campaign_id = campaigns.create_campaign(new_campaign(name)).await?;
        campaigns.attach_channel(campaign_id, channel_id).await?;
    }

    let refused = channels.delete_channel_safe(channel_id, false).await?;
    assert!(!refused.deleted);
    assert_eq!(refused.linked_count, 3);
    assert_eq!(channels.campaigns_for_channel(channel_id).await?.len(), 3);

    let forced = channels.delete_channel_safe(channel_id, true).await?;
    assert!(forced.deleted);
    assert_eq!(forced.linked_count, 3);
    assert!(channels.get_channel(channel_id).await?.is_none());

    // Campaigns survive the channel delete
    assert_eq!(campaigns.list_campaigns(50, 0, None).await?.len(), 3);
    assert!(matches!(
        channels.campaigns_for_channel(channel_id).await,
        Err(ServiceError::NotFound { entity: "channel", .. })
    ));
    Ok(())
}

#[tokio::test]
async fn snapshot_reports_rows_and_counts() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let campaigns = CampaignService::new(db.clone());
    let channels = ChannelService::new(db.clone());

    let spring = campaigns.create_campaign(new_campaign("Spring")).await?;
    campaigns.create_campaign(new_campaign("Autumn")).await?;
    let search = channels.create_channel("Search", None).await?;
    let email = channels.create_channel("Email", None).await?;
    campaigns.attach_channel(spring, search).await?;
    campaigns.attach_channel(spring, email).await?;

    let snapshot = InspectService::new(db).snapshot().await?;
    assert_eq!(snapshot.campaigns.len(), 2);
    assert_eq!(snapshot.channels.len(), 2);
    assert_eq!(snapshot.mappings.len(), 2);
    assert!(snapshot.mappings.iter().all(|m| m.campaign_name == "Spring"));
    assert_eq!(snapshot.stats.links, 2);
    assert_eq!(snapshot.stats.campaigns_with_channels, 1);
    assert_eq!(snapshot.stats.channels_with_campaigns, 2);
    Ok(())
}

#[tokio::test]
async fn snapshot_includes_every_row_past_one_page() -> Result<()> {
    let db = setup_test_db_arc().await?;
    let campaigns = CampaignService::new(db.clone());
    let channels = ChannelService::new(db.clone());

    for n in 0..1005 {
        campaigns.create_campaign(new_campaign(&format!("Campaign {n}"))).await?;
    }
    let search = channels.create_channel("Search", None).await?;
    campaigns.attach_channel(1, search).await?;

    let snapshot = InspectService::new(db).snapshot().await?;
    assert_eq!(snapshot.campaigns.len(), 1005);
    assert_eq!(snapshot.channels.len(), 1);

    let mut ids: Vec<i32> = snapshot.campaigns.iter().map(|c| c.campaign_id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 1005);
    // The oldest campaign, named by the mapping, is present in the campaign list
    assert!(ids.contains(&snapshot.mappings[0].campaign_id));
    Ok(())
}

