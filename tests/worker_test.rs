//! Job ordering, cancellation and export behavior of the worker.

mod common;

use common::fixtures;
use pixelforge::models::{JobId, WorkerEvent};
use pixelforge::rendering::{decode_png, encode_png, JobSource};
use pixelforge::services::{JobRequest, Request, WorkerHandle, WorkerOptions};
use pretty_assertions::assert_eq;
use tile_quant::{MapperKind, PixelBuffer, Rgba8};

fn job(id: u64, block_size: u32, source: Option<PixelBuffer>) -> Request {
    Request::Process(JobRequest {
        job_id: JobId(id),
        block_size,
        source: source.map(JobSource::from),
        colorize: None,
        palette: None,
        mapper: None,
    })
}

fn expect_result(event: Option<WorkerEvent>, id: u64) -> pixelforge::models::JobResult {
    match event {
        Some(WorkerEvent::Result(result)) => {
            assert_eq!(result.job_id, JobId(id));
            result
        }
        other => panic!("expected result for job {id}, got {other:?}"),
    }
}

#[tokio::test]
async fn test_newest_job_wins() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());
    let source = fixtures::gradient(24, 24);

    let first = worker.post(job(1, 4, Some(source.clone()))).unwrap();
    let second = worker.post(job(2, 8, Some(source))).unwrap();

    assert!(first.recv().await.is_none());
    let result = expect_result(second.recv().await, 2);
    assert_eq!(result.meta.block_size, 8);
}

#[tokio::test]
async fn test_superseded_while_running() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());
    let source = fixtures::gradient(64, 64);

    let first = worker.post(job(1, 2, Some(source.clone()))).unwrap();
    tokio::task::yield_now().await;
    let second = worker.post(job(2, 4, Some(source))).unwrap();

    assert!(first.recv().await.is_none());
    expect_result(second.recv().await, 2);
}

fn png_job(id: u64, block_size: u32, png: Vec<u8>) -> Request {
    Request::Process(JobRequest {
        job_id: JobId(id),
        block_size,
        source: Some(JobSource::Png(png)),
        colorize: None,
        palette: None,
        mapper: None,
    })
}

#[tokio::test]
async fn test_png_job_keeps_submission_order() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());
    let png = encode_png(&fixtures::noise(256, 256)).unwrap();

    let first = worker.post(png_job(1, 8, png)).unwrap();
    let second = worker.post(job(2, 2, Some(fixtures::gradient(4, 4)))).unwrap();

    assert!(first.recv().await.is_none());
    expect_result(second.recv().await, 2);
}

#[tokio::test]
async fn test_png_source_decoded_and_bounded() {
    let options = WorkerOptions {
        max_source_dimension: 32,
        ..WorkerOptions::default()
    };
    let worker = WorkerHandle::spawn(options);
    let png = encode_png(&fixtures::gradient(128, 64)).unwrap();

    let pending = worker.post(png_job(1, 4, png)).unwrap();

    let result = expect_result(pending.recv().await, 1);
    assert_eq!((result.meta.tiles_x, result.meta.tiles_y), (8, 4));
}

#[tokio::test]
async fn test_undecodable_png_reports_error() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let pending = worker.post(png_job(1, 4, b"not a png".to_vec())).unwrap();

    match pending.recv().await {
        Some(WorkerEvent::Error(failure)) => {
            assert_eq!(failure.job_id, JobId(1));
            assert!(failure.message.starts_with("could not decode source image"));
        }
        other => panic!("expected error, got {other:?}"),
    }

    // A failed decode leaves the session without a source
    let next = worker.post(job(2, 4, None)).unwrap();
    assert!(matches!(next.recv().await, Some(WorkerEvent::Error(_))));
}

#[tokio::test]
async fn test_cancelled_png_job_is_silent() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());
    let png = encode_png(&fixtures::noise(256, 256)).unwrap();

    let pending = worker.post(png_job(1, 8, png)).unwrap();
    worker.send(Request::Cancel(JobId(1))).unwrap();

    assert!(pending.recv().await.is_none());
}

#[tokio::test]
async fn test_cancelled_job_is_silent() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let pending = worker.post(job(1, 4, Some(fixtures::gradient(8, 8)))).unwrap();
    worker.send(Request::Cancel(JobId(1))).unwrap();

    assert!(pending.recv().await.is_none());

    // Nothing was emitted, so there is nothing to export
    let export = worker.post(Request::Export(JobId(1))).unwrap();
    assert!(export.recv().await.is_none());
}

#[tokio::test]
async fn test_cancel_of_other_job_is_ignored() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let pending = worker.post(job(2, 4, Some(fixtures::gradient(8, 8)))).unwrap();
    worker.send(Request::Cancel(JobId(1))).unwrap();

    expect_result(pending.recv().await, 2);
}

#[tokio::test]
async fn test_missing_source_reports_error() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let pending = worker.post(job(1, 4, None)).unwrap();

    match pending.recv().await {
        Some(WorkerEvent::Error(failure)) => {
            assert_eq!(failure.job_id, JobId(1));
            assert!(failure.message.contains("no source image"));
        }
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_superseded_failure_is_silent() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let failing = worker.post(job(1, 4, None)).unwrap();
    let next = worker.post(job(2, 4, Some(fixtures::gradient(8, 8)))).unwrap();

    assert!(failing.recv().await.is_none());
    expect_result(next.recv().await, 2);
}

#[tokio::test]
async fn test_later_job_inherits_session() {
    let options = WorkerOptions {
        colorize: true,
        mapper: MapperKind::Classic,
        optimize_export: false,
        ..WorkerOptions::default()
    };
    let worker = WorkerHandle::spawn(options);
    let source = PixelBuffer::filled(8, 8, Rgba8::opaque(250, 10, 10));

    let first = worker
        .post(Request::Process(JobRequest {
            job_id: JobId(1),
            block_size: 4,
            source: Some(source.into()),
            colorize: None,
            palette: Some(vec![0, 0, 0, 255, 255, 0, 0, 255]),
            mapper: None,
        }))
        .unwrap();
    let first = expect_result(first.recv().await, 1);
    assert_eq!(&first.pixels[..4], &[255, 0, 0, 255]);

    // Same source and palette, new block size
    let second = worker.post(job(2, 8, None)).unwrap();
    let second = expect_result(second.recv().await, 2);
    assert_eq!(second.meta.tiles_x, 1);
    assert_eq!(second.pixels, vec![255, 0, 0, 255]);

    // Colorize off keeps the averaged color
    let third = worker
        .post(Request::Process(JobRequest {
            job_id: JobId(3),
            block_size: 8,
            source: None,
            colorize: Some(false),
            palette: None,
            mapper: None,
        }))
        .unwrap();
    let third = expect_result(third.recv().await, 3);
    assert_eq!(third.pixels, vec![250, 10, 10, 255]);
}

#[tokio::test]
async fn test_export_matches_last_result() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let pending = worker
        .post(Request::Process(JobRequest {
            job_id: JobId(4),
            block_size: 4,
            source: Some(fixtures::gradient(16, 12).into()),
            colorize: Some(true),
            palette: Some(fixtures::PICO8_FLAT.to_vec()),
            mapper: Some(MapperKind::Perceptual),
        }))
        .unwrap();
    let result = expect_result(pending.recv().await, 4);

    match worker.post(Request::Export(JobId(4))).unwrap().recv().await {
        Some(WorkerEvent::ExportFile(file)) => {
            assert_eq!(file.job_id, JobId(4));
            let decoded = decode_png(&file.file_bytes).unwrap();
            assert_eq!(
                (decoded.width(), decoded.height()),
                (result.meta.out_width, result.meta.out_height)
            );
            assert_eq!(decoded.data(), result.pixels.as_slice());
        }
        other => panic!("expected export file, got {other:?}"),
    }
}

#[tokio::test]
async fn test_export_of_stale_job_is_silent() {
    let worker = WorkerHandle::spawn(WorkerOptions::default());

    let first = worker.post(job(1, 4, Some(fixtures::gradient(8, 8)))).unwrap();
    expect_result(first.recv().await, 1);
    let second = worker.post(job(2, 2, None)).unwrap();
    expect_result(second.recv().await, 2);

    let export = worker.post(Request::Export(JobId(1))).unwrap();
    assert!(export.recv().await.is_none());
}

#[tokio::test]
async fn test_results_are_deterministic() {
    let source = fixtures::gradient(40, 30);
    let mut outputs = Vec::new();
    for _ in 0..2 {
        let worker = WorkerHandle::spawn(WorkerOptions::default());
        let pending = worker
            .post(Request::Process(JobRequest {
                job_id: JobId(1),
                block_size: 5,
                source: Some(source.clone().into()),
                colorize: Some(true),
                palette: Some(fixtures::PICO8_FLAT.to_vec()),
                mapper: None,
            }))
            .unwrap();
        outputs.push(expect_result(pending.recv().await, 1).pixels);
    }
    assert_eq!(outputs[0], outputs[1]);
}
