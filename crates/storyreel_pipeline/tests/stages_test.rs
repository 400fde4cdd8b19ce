// Tests for the three pipeline stages against a scripted model.

mod test_utils;

use async_trait::async_trait;
use storyreel_audio::{WAV_HEADER_LEN, WavHeader, WavSpec};
use storyreel_core::{
    DataUri, FrameImage, Input, ScriptText, SpeechConfig, Storyboard, StoryboardFrame,
    WAV_MIME_TYPE,
};
use storyreel_error::{GeminiErrorKind, StageErrorKind, StoryreelResult};
use storyreel_interface::VideoSynthesizer;
use storyreel_pipeline::{
    AnalysisStage, DEFAULT_VIDEO_URL, PlaceholderVideo, StoryboardStage, TrailerStage,
};
use test_utils::{
    IMAGE_MODEL, MockModel, MockReply, SPEECH_MODEL, TEXT_MODEL, analysis_reply, audio_reply,
    image_reply, script_reply,
};

fn scenes(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn trailer_stage(mock: MockModel) -> TrailerStage<MockModel> {
    TrailerStage::new(
        mock,
        TEXT_MODEL,
        SPEECH_MODEL,
        SpeechConfig::new("Algenib"),
        WavSpec::SPEECH,
        PlaceholderVideo::default(),
    )
}

fn two_frame_storyboard() -> Storyboard {
    Storyboard::new(vec![
        StoryboardFrame::new(
            FrameImage::Ready(DataUri::from_bytes("image/png", &[1, 2, 3])),
            "Capsule drifts",
        ),
        StoryboardFrame::new(FrameImage::Failed, "Red light flashes"),
    ])
}

//
// ─── ANALYSIS ───────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn test_analyze_parses_structured_reply() {
    let mock = MockModel::new().on_model(
        TEXT_MODEL,
        analysis_reply("An astronaut receives a signal.", &["Drift", "Alarm", "Signal"]),
    );
    let stage = AnalysisStage::new(mock.clone(), TEXT_MODEL);

    let analysis = stage
        .analyze(&ScriptText::new("A lone astronaut drifts..."))
        .await
        .unwrap();

    assert_eq!(analysis.summary(), "An astronaut receives a signal.");
    assert_eq!(analysis.key_scenes(), &scenes(&["Drift", "Alarm", "Signal"]));
    assert_eq!(mock.call_count(), 1);

    let request = &mock.requests()[0];
    assert!(request.response_schema().is_some());
    assert_eq!(request.model().as_deref(), Some(TEXT_MODEL));
}

#[tokio::test]
async fn test_analyze_tolerates_markdown_fence() {
    let reply = "```json\n{\"summary\": \"s\", \"keyScenes\": [\"a\"], \"visualElements\": []}\n```";
    let mock = MockModel::new().on_model(TEXT_MODEL, MockReply::Text(reply.to_string()));
    let stage = AnalysisStage::new(mock, TEXT_MODEL);

    let analysis = stage.analyze(&ScriptText::new("script")).await.unwrap();
    assert_eq!(analysis.key_scenes().len(), 1);
}

#[tokio::test]
async fn test_analyze_missing_field_is_invalid_response() {
    let reply = "{\"summary\": \"s\", \"keyScenes\": [\"a\"]}";
    let mock = MockModel::new().on_model(TEXT_MODEL, MockReply::Text(reply.to_string()));
    let stage = AnalysisStage::new(mock, TEXT_MODEL);

    let err = stage.analyze(&ScriptText::new("script")).await.unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::ModelResponseInvalid(_)));
}

#[tokio::test]
async fn test_analyze_wrong_type_is_invalid_response() {
    let reply = "{\"summary\": \"s\", \"keyScenes\": \"a\", \"visualElements\": []}";
    let mock = MockModel::new().on_model(TEXT_MODEL, MockReply::Text(reply.to_string()));
    let stage = AnalysisStage::new(mock, TEXT_MODEL);

    let err = stage.analyze(&ScriptText::new("script")).await.unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::ModelResponseInvalid(_)));
}

#[tokio::test]
async fn test_analyze_upstream_error() {
    let mock = MockModel::new().on_model(
        TEXT_MODEL,
        MockReply::Error(GeminiErrorKind::Timeout("deadline".to_string())),
    );
    let stage = AnalysisStage::new(mock.clone(), TEXT_MODEL);

    let err = stage.analyze(&ScriptText::new("script")).await.unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::UpstreamUnavailable(_)));
    // No retries at this layer
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_analyze_undecodable_body_is_invalid_response() {
    let mock = MockModel::new().on_model(
        TEXT_MODEL,
        MockReply::Error(GeminiErrorKind::InvalidResponse(
            "error decoding response body".to_string(),
        )),
    );
    let stage = AnalysisStage::new(mock, TEXT_MODEL);

    let err = stage.analyze(&ScriptText::new("script")).await.unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::ModelResponseInvalid(_)));
}

//
// ─── STORYBOARD ─────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn test_illustrate_one_failed_image() {
    let mock = MockModel::new()
        .on_model(IMAGE_MODEL, image_reply(0))
        .on_prompt(IMAGE_MODEL, "Alarm", MockReply::Empty);
    let stage = StoryboardStage::new(mock.clone(), IMAGE_MODEL, 4);

    let storyboard = stage
        .illustrate(&scenes(&["Drift", "Alarm", "Signal"]))
        .await;

    assert_eq!(storyboard.len(), 3);
    assert_eq!(storyboard.failed_count(), 1);
    let refs: Vec<String> = storyboard.frames().iter().map(|f| f.image_ref()).collect();
    assert!(!refs[0].is_empty());
    assert_eq!(refs[1], "");
    assert!(!refs[2].is_empty());
    assert_eq!(storyboard.frames()[1].scene_description(), "Alarm");
    assert_eq!(mock.calls_for(IMAGE_MODEL), 3);
}

#[tokio::test]
async fn test_illustrate_upstream_error_and_non_image_become_failed_frames() {
    let mock = MockModel::new()
        .on_model(IMAGE_MODEL, image_reply(0))
        .on_prompt(
            IMAGE_MODEL,
            "Drift",
            MockReply::Error(GeminiErrorKind::HttpError {
                status_code: 500,
                message: "internal".to_string(),
            }),
        )
        .on_prompt(IMAGE_MODEL, "Signal", audio_reply(&[0, 0]));
    let stage = StoryboardStage::new(mock, IMAGE_MODEL, 2);

    let storyboard = stage
        .illustrate(&scenes(&["Drift", "Alarm", "Signal"]))
        .await;

    let states: Vec<bool> = storyboard
        .frames()
        .iter()
        .map(|f| f.image().is_failed())
        .collect();
    assert_eq!(states, vec![true, false, true]);
}

#[tokio::test]
async fn test_illustrate_corrupt_image_payload_is_failed_frame() {
    let mock = MockModel::new().on_model(IMAGE_MODEL, image_reply(0)).on_prompt(
        IMAGE_MODEL,
        "Alarm",
        MockReply::Media("data:image/png;base64,@@@".parse().unwrap()),
    );
    let stage = StoryboardStage::new(mock, IMAGE_MODEL, 3);

    let storyboard = stage
        .illustrate(&scenes(&["Drift", "Alarm", "Signal"]))
        .await;

    assert_eq!(storyboard.failed_count(), 1);
    assert!(storyboard.frames()[1].image().is_failed());
    assert_eq!(storyboard.frames()[1].image_ref(), "");
    assert!(!storyboard.frames()[0].image().is_failed());
    assert!(!storyboard.frames()[2].image().is_failed());
}

#[tokio::test(start_paused = true)]
async fn test_illustrate_keeps_input_order_under_varied_latency() {
    // Earlier scenes finish last
    let mock = MockModel::new()
        .on_prompt(IMAGE_MODEL, "scene-0", image_reply(0).after_ms(300))
        .on_prompt(IMAGE_MODEL, "scene-1", image_reply(1).after_ms(200))
        .on_prompt(IMAGE_MODEL, "scene-2", image_reply(2).after_ms(100))
        .on_prompt(IMAGE_MODEL, "scene-3", image_reply(3).after_ms(10));
    let stage = StoryboardStage::new(mock, IMAGE_MODEL, 4);

    let storyboard = stage
        .illustrate(&scenes(&["scene-0", "scene-1", "scene-2", "scene-3"]))
        .await;

    for (index, frame) in storyboard.frames().iter().enumerate() {
        assert_eq!(frame.scene_description(), &format!("scene-{}", index));
        let FrameImage::Ready(uri) = frame.image() else {
            panic!("frame {} should have an image", index);
        };
        assert_eq!(uri.decode().unwrap().last(), Some(&(index as u8)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_illustrate_sequential_when_concurrency_is_one() {
    let mock = MockModel::new()
        .on_prompt(IMAGE_MODEL, "scene-0", image_reply(0).after_ms(50))
        .on_prompt(IMAGE_MODEL, "scene-1", image_reply(1));
    let stage = StoryboardStage::new(mock.clone(), IMAGE_MODEL, 1);

    let storyboard = stage.illustrate(&scenes(&["scene-0", "scene-1"])).await;

    assert_eq!(storyboard.failed_count(), 0);
    let order: Vec<String> = mock
        .requests()
        .iter()
        .map(|req| test_utils::mock_model::prompt_text(req))
        .collect();
    assert!(order[0].contains("scene-0"));
    assert!(order[1].contains("scene-1"));
}

#[tokio::test]
async fn test_illustrate_no_scenes() {
    let mock = MockModel::new();
    let stage = StoryboardStage::new(mock.clone(), IMAGE_MODEL, 4);

    let storyboard = stage.illustrate(&[]).await;

    assert!(storyboard.is_empty());
    assert_eq!(mock.call_count(), 0);
}

//
// ─── TRAILER ────────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn test_compose_trailer_encodes_voice_over() {
    let pcm: Vec<u8> = (0..=255u8).cycle().take(4800).collect();
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("In a world of silence..."))
        .on_model(SPEECH_MODEL, audio_reply(&pcm));
    let stage = trailer_stage(mock.clone());

    let trailer = stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap();

    assert_eq!(trailer.video_ref(), DEFAULT_VIDEO_URL);
    assert_eq!(trailer.audio_track().mime_type(), WAV_MIME_TYPE);

    let wav = trailer.audio_track().decode().unwrap();
    assert_eq!(wav.len(), WAV_HEADER_LEN + pcm.len());
    let header = WavHeader::parse(&wav).unwrap();
    assert_eq!(*header.spec(), WavSpec::SPEECH);
    assert_eq!(*header.data_len() as usize, pcm.len());
    assert_eq!(&wav[WAV_HEADER_LEN..], pcm.as_slice());

    // Speech request carries the script and the voice
    let speech = mock
        .requests()
        .into_iter()
        .find(|req| req.model().as_deref() == Some(SPEECH_MODEL))
        .unwrap();
    assert_eq!(
        speech.speech().as_ref().map(|s| s.voice_name().as_str()),
        Some("Algenib")
    );
    assert_eq!(
        test_utils::mock_model::prompt_text(&speech),
        "In a world of silence..."
    );
}

#[tokio::test]
async fn test_compose_trailer_sends_ready_images_only() {
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("script"))
        .on_model(SPEECH_MODEL, audio_reply(&[0, 0, 1, 0]));
    let stage = trailer_stage(mock.clone());

    stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap();

    let script_request = mock
        .requests()
        .into_iter()
        .find(|req| req.model().as_deref() == Some(TEXT_MODEL))
        .unwrap();
    let content = &script_request.messages()[0].content;
    let images = content
        .iter()
        .filter(|part| matches!(part, Input::Image { .. }))
        .count();
    assert_eq!(images, 1);

    let text = test_utils::mock_model::prompt_text(&script_request);
    assert!(text.contains("Scene Description: Capsule drifts"));
    assert!(text.contains("Scene Description: Red light flashes"));
    assert!(text.contains("Trailer Prompt: Tense"));
}

#[tokio::test]
async fn test_compose_trailer_no_audio_returned() {
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("script"))
        .on_model(SPEECH_MODEL, MockReply::Empty);
    let stage = trailer_stage(mock);

    let err = stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap_err();
    assert_eq!(err.kind, StageErrorKind::NoAudioReturned);
}

#[tokio::test]
async fn test_compose_trailer_blank_script_skips_voice() {
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("   "))
        .on_model(SPEECH_MODEL, audio_reply(&[0, 0]));
    let stage = trailer_stage(mock.clone());

    let err = stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::ModelResponseInvalid(_)));
    assert_eq!(mock.calls_for(SPEECH_MODEL), 0);
}

#[tokio::test]
async fn test_compose_trailer_undecodable_audio() {
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("script"))
        .on_model(
            SPEECH_MODEL,
            MockReply::Media(DataUri::from_base64("audio/L16", "not*base64!")),
        );
    let stage = trailer_stage(mock);

    let err = stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::ModelResponseInvalid(_)));
}

#[tokio::test]
async fn test_compose_trailer_speech_upstream_error() {
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("script"))
        .on_model(
            SPEECH_MODEL,
            MockReply::Error(GeminiErrorKind::HttpError {
                status_code: 503,
                message: "overloaded".to_string(),
            }),
        );
    let stage = trailer_stage(mock);

    let err = stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap_err();
    assert!(matches!(err.kind, StageErrorKind::UpstreamUnavailable(_)));
}

struct FixedVideo;

#[async_trait]
impl VideoSynthesizer for FixedVideo {
    async fn synthesize(&self, storyboard: &Storyboard, _script: &str) -> StoryreelResult<String> {
        Ok(format!("file:///renders/{}-frames.mp4", storyboard.len()))
    }
}

#[tokio::test]
async fn test_compose_trailer_uses_video_synthesizer() {
    let mock = MockModel::new()
        .on_model(TEXT_MODEL, script_reply("script"))
        .on_model(SPEECH_MODEL, audio_reply(&[0, 0]));
    let stage = TrailerStage::new(
        mock,
        TEXT_MODEL,
        SPEECH_MODEL,
        SpeechConfig::new("Algenib"),
        WavSpec::SPEECH,
        FixedVideo,
    );

    let trailer = stage
        .compose_trailer(&two_frame_storyboard(), "Tense")
        .await
        .unwrap();
    assert_eq!(trailer.video_ref(), "file:///renders/2-frames.mp4");
}
