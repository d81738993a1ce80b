//! Demo data for a fresh install, enabled with SEED_DEMO=1: a system user
//! owning one published portfolio site with two starter pages.

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::{password, repo as users};
use crate::blocks::{encode_content, Block, BlockBody, FeaturesContent, HeroContent, TextContent};
use crate::pages::repo::{self as pages, NewPage};
use crate::sites::repo::{self as sites, NewSite};
use crate::state::AppState;

const DEMO_EMAIL: &str = "system@demo.local";

fn home_content() -> Value {
    encode_content(&[
        Block {
            id: "hero".into(),
            body: BlockBody::Hero(HeroContent {
                title: "Welcome to My Portfolio".into(),
                subtitle: "I build amazing things on the web.".into(),
                cta_text: String::new(),
            }),
        },
        Block {
            id: "features".into(),
            body: BlockBody::Features(FeaturesContent {
                feature1_title: "Web Development".into(),
                feature2_title: "Design".into(),
                feature3_title: "Product".into(),
                ..Default::default()
            }),
        },
    ])
}

fn about_content() -> Value {
    encode_content(&[Block {
        id: "text".into(),
        body: BlockBody::Text(TextContent {
            heading: String::new(),
            body: "I am a passionate creator.".into(),
        }),
    }])
}

pub async fn seed_demo(state: &AppState) -> anyhow::Result<()> {
    let user = match users::find_by_email(&state.db, DEMO_EMAIL).await? {
        Some(user) => user,
        None => {
            // Nobody logs in as the system user; the password is thrown away.
            let hash = password::hash_password(&Uuid::new_v4().to_string())?;
            users::create(&state.db, DEMO_EMAIL, &hash).await?
        }
    };

    if !sites::list_for_user(&state.db, user.id).await?.is_empty() {
        return Ok(());
    }

    info!("seeding demo site");
    let site = sites::create(
        &state.db,
        &NewSite {
            user_id: user.id,
            name: "Demo Portfolio".into(),
            description: Some("A showcase of what you can build.".into()),
            slug: "demo-portfolio".into(),
            is_published: true,
        },
    )
    .await?;

    pages::create(
        &state.db,
        &NewPage {
            site_id: site.id,
            title: "Home".into(),
            slug: "home".into(),
            content: home_content(),
            order: 0,
        },
    )
    .await?;

    pages::create(
        &state.db,
        &NewPage {
            site_id: site.id,
            title: "About".into(),
            slug: "about".into(),
            content: about_content(),
            order: 1,
        },
    )
    .await?;

    info!(site_id = site.id, "demo site seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::decode_content;

    #[test]
    fn seed_content_passes_strict_validation() {
        crate::blocks::validate_content(&home_content()).unwrap();
        crate::blocks::validate_content(&about_content()).unwrap();
    }

    #[test]
    fn seed_home_page_decodes_to_two_blocks() {
        let blocks = decode_content(&home_content());
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0].body, BlockBody::Hero(_)));
        assert!(matches!(blocks[1].body, BlockBody::Features(_)));
    }
}
