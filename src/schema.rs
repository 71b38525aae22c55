//! Structured-output schemas for schema-constrained model calls, in the
//! Gemini REST representation. The property descriptions carry most of the
//! prompt engineering; the gateway never validates replies against these
//! shapes (see the gateway module for which replies get decoded).

use serde_json::{json, Value};

/// Fixed scoring schema for the virality audit.
pub fn insights() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "viralScore": {
                "type": "INTEGER",
                "description": "A brutally honest virality score from 1-100, based on psychology and known viral patterns."
            },
            "emotionalAccuracy": {
                "type": "INTEGER",
                "description": "A score from 1-100 on how well the post reflects the intended emotions."
            },
            "platformOptimization": {
                "type": "INTEGER",
                "description": "A score from 1-100 on how well the post is structured, toned, and formatted for the target platform."
            },
            "readability": {
                "type": "INTEGER",
                "description": "A score from 1-100 on the clarity, flow, and ease of reading."
            },
            "shareability": {
                "type": "INTEGER",
                "description": "A score from 1-100 predicting the likelihood a user would share or save this post."
            },
            "quotableLine": {
                "type": "STRING",
                "description": "The single most powerful, standout line from the post. If none exists, state 'No standout line identified.'."
            },
            "suggestions": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "Two brutally honest, constructive improvement ideas if the viral score is below 85. If the score is 85 or above, provide one 'Next-Level Tweak' to push it even further."
            },
            "howToPost": {
                "type": "STRING",
                "description": "A tactical guide on HOW to post the content for maximum impact. This guide MUST be specific to the target platform. Include timing, cross-promotion ideas, and a first-comment strategy. Format this as a step-by-step list."
            }
        },
        "required": ["viralScore", "emotionalAccuracy", "platformOptimization", "readability", "shareability", "quotableLine", "suggestions", "howToPost"]
    })
}

pub fn youtube_script() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A viral, SEO-optimized title for the YouTube video."
            },
            "hook": {
                "type": "STRING",
                "description": "A 15-second hook for the video script to maximize viewer retention."
            },
            "script": {
                "type": "STRING",
                "description": "The full video script, formatted with scene cues or spoken lines."
            },
            "description": {
                "type": "STRING",
                "description": "A full YouTube description, including a summary, timestamps, and links."
            },
            "cta": {
                "type": "STRING",
                "description": "A clear call-to-action for the end of the video."
            },
            "hashtags": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "An array of 5-10 relevant hashtags."
            },
            "thumbnailIdeas": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "An array of 3 distinct, clickable thumbnail concepts."
            }
        },
        "required": ["title", "hook", "script", "description", "cta", "hashtags", "thumbnailIdeas"]
    })
}

pub fn linkedin_post() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hook": {
                "type": "STRING",
                "description": "The powerful, attention-grabbing first line of the post."
            },
            "body": {
                "type": "STRING",
                "description": "The main content of the post, formatted with double line breaks for readability on LinkedIn."
            },
            "cta": {
                "type": "STRING",
                "description": "A clear call-to-action or question to drive engagement at the end of the post."
            },
            "suggestedVisual": {
                "type": "STRING",
                "description": "A brief idea for a compelling visual (image, diagram, or short video) to accompany the post. E.g., 'A minimalist graphic showing the 3 steps.' or 'No visual needed'."
            }
        },
        "required": ["hook", "body", "cta", "suggestedVisual"]
    })
}

pub fn twitter_thread() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hookTweet": {
                "type": "STRING",
                "description": "The first tweet of the thread, designed for maximum virality and intrigue. Must be under 280 characters."
            },
            "threadTweets": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "An array of 2-5 subsequent tweets that elaborate on the hook. Each tweet must be under 280 characters."
            },
            "finalTweet": {
                "type": "STRING",
                "description": "The concluding tweet, often containing a summary, a call-to-action, or a link. Under 280 characters."
            },
            "hashtags": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "An array of 2-4 relevant hashtags."
            }
        },
        "required": ["hookTweet", "threadTweets", "finalTweet", "hashtags"]
    })
}

pub fn instagram_post() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "caption": {
                "type": "STRING",
                "description": "The full post caption, including a strong hook, value-packed body, and a clear CTA. Use emojis where appropriate."
            },
            "hashtags": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "A block of 10-15 relevant hashtags."
            },
            "visualType": {
                "type": "STRING",
                "description": "The suggested visual format. Must be one of: 'Single Image', 'Carousel', 'Reel'."
            },
            "visualIdeas": {
                "type": "ARRAY",
                "items": {"type": "STRING"},
                "description": "An array of ideas for the visual. If 'Single Image', one idea. If 'Reel', a brief script or shot list. If 'Carousel', a title/idea for each slide (e.g., 'Slide 1: Hook', 'Slide 2: The Problem')."
            }
        },
        "required": ["caption", "hashtags", "visualType", "visualIdeas"]
    })
}

pub fn blog_post() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A catchy, SEO-friendly title for the blog post."
            },
            "metaDescription": {
                "type": "STRING",
                "description": "A 160-character meta description for search engine results."
            },
            "introduction": {
                "type": "STRING",
                "description": "The hook-heavy introduction paragraph(s) for the blog post."
            },
            "bodySections": {
                "type": "ARRAY",
                "description": "An array of objects, where each object represents a section of the blog post.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "heading": {
                            "type": "STRING",
                            "description": "The H2 or H3 heading for this section."
                        },
                        "content": {
                            "type": "STRING",
                            "description": "The paragraph(s) for this section. Use double line breaks for new paragraphs."
                        }
                    },
                    "required": ["heading", "content"]
                }
            },
            "conclusion": {
                "type": "STRING",
                "description": "The concluding paragraph, summarizing the key points and providing a final call-to-action."
            },
            "suggestedImagePrompt": {
                "type": "STRING",
                "description": "A prompt for an AI image generator to create a featured image for the blog post."
            }
        },
        "required": ["title", "metaDescription", "introduction", "bodySections", "conclusion", "suggestedImagePrompt"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_requires_all_declared_properties() {
        for schema in [insights(), youtube_script(), linkedin_post(), twitter_thread(), instagram_post(), blog_post()] {
            let properties = schema["properties"].as_object().unwrap();
            let required: Vec<&str> = schema["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            for key in required {
                assert!(properties.contains_key(key), "required key '{}' missing", key);
            }
        }
    }

    #[test]
    fn instagram_schema_shapes_the_expected_package() {
        let schema = instagram_post();
        let properties = schema["properties"].as_object().unwrap();
        for key in ["caption", "hashtags", "visualType", "visualIdeas"] {
            assert!(properties.contains_key(key));
        }
    }
}
